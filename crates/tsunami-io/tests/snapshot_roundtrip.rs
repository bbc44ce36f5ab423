//! Integration tests for writing snapshot files and reading them back.

use std::path::Path;

use nc_store::{StoreError, StoreReader, StoreWriter, ValueKind, VariableSpec};
use test_utils::{assert_approx_eq, assert_slice_approx_eq, create_test_grid, pad_rows};
use tsunami_io::{Field, SnapshotReader, SnapshotWriter, TsunamiIoError};

const NX: usize = 4;
const NY: usize = 3;
const CELL: f64 = 10.0;

/// Fractional values that are not exact in f32.
fn field(offset: f64) -> Vec<f64> {
    (0..NX * NY).map(|i| offset + i as f64 / 3.0).collect()
}

/// A snapshot laid out by hand, with an optional layout version and the
/// given dimensions for `momentum_y`.
fn write_by_hand(path: &Path, version: Option<&str>, momentum_y_dims: &[&str]) {
    let mut store = StoreWriter::create(path).expect("create store");
    store.define_dimension("x", NX).unwrap();
    store.define_dimension("y", NY).unwrap();
    store.define_unlimited_dimension("time").unwrap();
    for (name, dims) in [("x", &["x"][..]), ("y", &["y"][..]), ("time", &["time"][..])] {
        store
            .define_variable(&VariableSpec::new(name, dims, ValueKind::F64))
            .unwrap();
    }
    for name in ["height", "momentum_x"] {
        store
            .define_variable(&VariableSpec::new(name, &["time", "y", "x"], ValueKind::F32))
            .unwrap();
    }
    store
        .define_variable(&VariableSpec::new("momentum_y", momentum_y_dims, ValueKind::F32))
        .unwrap();
    store.put_global_attribute("cell_size", CELL).unwrap();
    if let Some(version) = version {
        store.put_global_attribute("snapshot_schema_version", version).unwrap();
    }
    store.end_definitions();
    store.write_all_f64("x", &[5.0, 15.0, 25.0, 35.0]).unwrap();
    store.write_all_f64("y", &[5.0, 15.0, 25.0]).unwrap();
    store.close();
}

#[test]
fn test_time_slices_round_trip() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("solver.nc");

    let mut writer = SnapshotWriter::create(&path, NX, NY, CELL).expect("create writer");
    writer
        .write_time_slice(&field(1.0), &field(-0.5), &field(0.25), NX, 0, 0.0)
        .expect("write step 0");
    writer
        .write_time_slice(&field(2.0), &field(0.5), &field(-0.25), NX, 1, 12.5)
        .expect("write step 1");
    assert_eq!(writer.time_steps(), 2);
    writer.close();

    let reader = SnapshotReader::open(&path).expect("open snapshot");
    assert_eq!(reader.grid().nx, NX);
    assert_eq!(reader.grid().ny, NY);
    assert_eq!(reader.grid().cell_size, CELL);
    assert_eq!(reader.time_steps().unwrap(), 2);
    assert_eq!(reader.times().unwrap(), vec![0.0, 12.5]);

    let slice = reader.read_time_slice(1).expect("read step 1");
    assert_eq!(slice.step, 1);
    assert_eq!(slice.time, 12.5);
    assert_slice_approx_eq!(&slice.height, &field(2.0), 1e-5);
    assert_slice_approx_eq!(&slice.momentum_x, &field(0.5), 1e-5);
    assert_slice_approx_eq!(&slice.momentum_y, &field(-0.25), 1e-5);

    let first = reader.read_time_slice(0).expect("read step 0");
    assert_slice_approx_eq!(&first.height, &field(1.0), 1e-5);
}

#[test]
fn test_cell_centres_written() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("coords.nc");
    SnapshotWriter::create(&path, NX, NY, CELL)
        .expect("create writer")
        .close();

    let store = StoreReader::open(&path).expect("open store");
    assert_eq!(store.read_all_f64("x").unwrap(), vec![5.0, 15.0, 25.0, 35.0]);
    assert_eq!(store.read_all_f64("y").unwrap(), vec![5.0, 15.0, 25.0]);
    assert_eq!(store.units("x").unwrap().as_deref(), Some("m"));
    assert_eq!(store.units("time").unwrap().as_deref(), Some("s"));
    assert_eq!(store.units("height").unwrap().as_deref(), Some("m"));
    assert_eq!(store.units("momentum_x").unwrap().as_deref(), Some("m/s"));
    assert_eq!(
        store.variable_dimensions("height").unwrap(),
        vec!["time", "y", "x"]
    );
    assert_eq!(store.global_f64("cell_size"), Some(CELL));
    assert_eq!(store.global_string("Conventions").as_deref(), Some("CF-1.8"));
}

#[test]
fn test_padded_stride_matches_tight() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let tight_path = temp_dir.path().join("tight.nc");
    let padded_path = temp_dir.path().join("padded.nc");

    let packed = create_test_grid(NX, NY);
    let padded = pad_rows(&packed, NX, NX + 2, f64::NAN);

    let mut tight = SnapshotWriter::create(&tight_path, NX, NY, CELL).unwrap();
    tight
        .write_time_slice(&packed, &packed, &packed, NX, 0, 0.0)
        .unwrap();
    tight.close();

    let mut ghost = SnapshotWriter::create(&padded_path, NX, NY, CELL).unwrap();
    ghost
        .write_time_slice(&padded, &padded, &padded, NX + 2, 0, 0.0)
        .unwrap();
    ghost.close();

    let a = SnapshotReader::open(&tight_path).unwrap().read_time_slice(0).unwrap();
    let b = SnapshotReader::open(&padded_path).unwrap().read_time_slice(0).unwrap();
    assert_eq!(a, b);
    assert!(b.height.iter().all(|v| v.is_finite()));
}

#[test]
fn test_packed_layout_is_row_major() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("layout.nc");

    let packed = create_test_grid(NX, NY);
    let mut writer = SnapshotWriter::create(&path, NX, NY, CELL).unwrap();
    writer
        .write_time_slice(&packed, &packed, &packed, NX, 0, 0.0)
        .unwrap();
    writer.close();

    let reader = SnapshotReader::open(&path).unwrap();
    // create_test_grid stores col * 1000 + row
    assert_eq!(reader.read_cell(Field::Height, 0, 3, 0).unwrap(), 3000.0);
    assert_eq!(reader.read_cell(Field::Height, 0, 0, 2).unwrap(), 2.0);
    assert_eq!(reader.read_cell(Field::MomentumY, 0, 2, 1).unwrap(), 2001.0);

    let err = reader.read_cell(Field::Height, 0, NX, 0).unwrap_err();
    assert!(matches!(err, TsunamiIoError::OutOfRangeLookup { .. }));
}

#[test]
fn test_bathymetry_second_write_wins() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("bathymetry.nc");

    let mut writer = SnapshotWriter::create(&path, NX, NY, CELL).unwrap();
    writer.write_bathymetry(&field(-100.0), NX).unwrap();
    writer.write_bathymetry(&field(-50.0), NX).unwrap();
    writer.close();

    let reader = SnapshotReader::open(&path).unwrap();
    let bathymetry = reader.read_bathymetry().unwrap().expect("bathymetry defined");
    assert_slice_approx_eq!(&bathymetry, &field(-50.0), 1e-4);
}

#[test]
fn test_bathymetry_optional() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("no_bathymetry.nc");

    SnapshotWriter::builder(&path)
        .grid(NX, NY, CELL)
        .bathymetry(false)
        .title("dam break")
        .build()
        .unwrap()
        .close();

    let reader = SnapshotReader::open(&path).unwrap();
    assert!(!reader.has_bathymetry());
    assert_eq!(reader.read_bathymetry().unwrap(), None);

    let store = StoreReader::open(&path).unwrap();
    assert_eq!(store.global_string("title").as_deref(), Some("dam break"));
}

#[test]
fn test_time_dimension_grows_to_highest_step() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("sparse.nc");
    let values = field(0.0);

    let mut writer = SnapshotWriter::create(&path, NX, NY, CELL).unwrap();
    writer
        .write_time_slice(&values, &values, &values, NX, 3, 30.0)
        .unwrap();
    assert_eq!(writer.time_steps(), 4);

    // lower step overwrites in place without shrinking
    writer
        .write_time_slice(&values, &values, &values, NX, 1, 10.0)
        .unwrap();
    assert_eq!(writer.time_steps(), 4);
    writer.close();

    let reader = SnapshotReader::open(&path).unwrap();
    assert_eq!(reader.time_steps().unwrap(), 4);
    let times = reader.times().unwrap();
    assert_eq!(times[1], 10.0);
    assert_eq!(times[3], 30.0);
}

#[test]
fn test_latest_time_slice_for_restart() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("restart.nc");

    let mut writer = SnapshotWriter::create(&path, NX, NY, CELL).unwrap();
    writer.close();
    {
        let reader = SnapshotReader::open(&path).unwrap();
        assert!(reader.latest_time_slice().unwrap().is_none());
        assert!(reader.times().unwrap().is_empty());
        assert!(matches!(
            reader.read_time_slice(0).unwrap_err(),
            TsunamiIoError::OutOfRangeLookup { .. }
        ));
    }

    writer = SnapshotWriter::create(&path, NX, NY, CELL).unwrap();
    for step in 0..3 {
        let h = field(step as f64);
        writer
            .write_time_slice(&h, &h, &h, NX, step, step as f64 * 2.0)
            .unwrap();
    }
    writer.close();

    let reader = SnapshotReader::open(&path).unwrap();
    let latest = reader.latest_time_slice().unwrap().expect("three slices");
    assert_eq!(latest.step, 2);
    assert_eq!(latest.time, 4.0);

    let restored = latest.to_f64(Field::Height);
    for (got, want) in restored.iter().zip(field(2.0)) {
        assert_approx_eq!(*got, want, 1e-5);
    }
}

#[test]
fn test_short_stride_rejected() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut writer =
        SnapshotWriter::create(temp_dir.path().join("stride.nc"), NX, NY, CELL).unwrap();

    let values = field(0.0);
    let err = writer
        .write_time_slice(&values, &values, &values, NX - 1, 0, 0.0)
        .unwrap_err();
    assert!(matches!(err, TsunamiIoError::InvalidBuffer(_)));

    let err = writer.write_bathymetry(&values[..NX], NX).unwrap_err();
    assert!(matches!(err, TsunamiIoError::InvalidBuffer(_)));
}

#[test]
fn test_create_in_missing_directory_fails() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("missing").join("solver.nc");

    let err = SnapshotWriter::create(&path, NX, NY, CELL).unwrap_err();
    assert!(matches!(err, TsunamiIoError::Resource(_)));
}

#[test]
fn test_resume_appends_after_last_slice() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("resume.nc");

    let mut writer = SnapshotWriter::builder(&path)
        .grid(NX, NY, CELL)
        .write_frequency(4)
        .build()
        .unwrap();
    for step in 0..3 {
        let h = field(step as f64);
        writer
            .write_time_slice(&h, &h, &h, NX, step, step as f64)
            .unwrap();
    }
    writer.close();

    let mut writer = SnapshotWriter::resume(&path).expect("resume snapshot");
    assert_eq!(writer.grid().nx, NX);
    assert_eq!(writer.grid().cell_size, CELL);
    assert_eq!(writer.write_frequency(), 4);
    assert_eq!(writer.time_steps(), 3);
    assert_eq!(writer.next_step(), 3);
    assert!(writer.sources().is_none());

    let h = field(3.0);
    let step = writer.next_step();
    writer.write_time_slice(&h, &h, &h, NX, step, 3.0).unwrap();
    writer.write_bathymetry(&field(-10.0), NX).unwrap();
    writer.close();

    let reader = SnapshotReader::open(&path).unwrap();
    assert_eq!(reader.time_steps().unwrap(), 4);
    assert_eq!(reader.times().unwrap(), vec![0.0, 1.0, 2.0, 3.0]);
    let slice = reader.read_time_slice(3).unwrap();
    assert_slice_approx_eq!(&slice.height, &field(3.0), 1e-5);
    let first = reader.read_time_slice(0).unwrap();
    assert_slice_approx_eq!(&first.height, &field(0.0), 1e-5);
}

#[test]
fn test_resume_missing_file_fails() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let err = SnapshotWriter::resume(temp_dir.path().join("absent.nc")).unwrap_err();
    assert!(matches!(err, TsunamiIoError::Resource(_)));
}

#[test]
fn test_foreign_layout_version_rejected() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("v2.nc");
    write_by_hand(&path, Some("2"), &["time", "y", "x"]);

    let err = SnapshotReader::open(&path).unwrap_err();
    assert!(matches!(err, TsunamiIoError::Resource(StoreError::InvalidFormat(_))));

    let err = SnapshotWriter::resume(&path).unwrap_err();
    assert!(matches!(err, TsunamiIoError::Resource(StoreError::InvalidFormat(_))));
}

#[test]
fn test_unversioned_layout_accepted() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("unversioned.nc");
    write_by_hand(&path, None, &["time", "y", "x"]);

    let reader = SnapshotReader::open(&path).expect("open unversioned snapshot");
    assert_eq!((reader.grid().nx, reader.grid().ny), (NX, NY));
    assert_eq!(reader.grid().cell_size, CELL);
    assert_eq!(reader.write_frequency(), 1);
    assert_eq!(reader.time_steps().unwrap(), 0);
}

#[test]
fn test_time_not_recorded_when_field_write_fails() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("partial.nc");
    // momentum_y lacks the time axis, so the third field write fails
    write_by_hand(&path, Some("1"), &["y", "x"]);

    let mut writer = SnapshotWriter::resume(&path).unwrap();
    let values = field(0.0);
    let err = writer
        .write_time_slice(&values, &values, &values, NX, 0, 5.0)
        .unwrap_err();
    assert!(matches!(err, TsunamiIoError::Resource(_)));
    writer.close();

    let store = StoreReader::open(&path).unwrap();
    let times = store.read_all_f64("time").unwrap_or_default();
    assert!(!times.contains(&5.0), "time recorded for an incomplete slice");
}
