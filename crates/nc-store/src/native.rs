//! Process-wide HDF5 setup and attribute helpers shared by the reader and writer.

use std::sync::Once;

/// Turn off HDF5's automatic error stack printing.
///
/// libhdf5 reports every failed call on stderr, including the ones the
/// readers here expect and handle, such as probing a snapshot for an
/// optional `cell_size` attribute. The output looks like:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 0:
///   #000: H5A.c line 528 in H5Aopen_by_name(): can't open attribute
/// ```
///
/// Call once near the top of `main`, before the first file is opened.
/// Later calls do nothing.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: a null handler and client pointer is the documented way to
        // disable automatic printing for the default error stack.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
pub(crate) fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get a text attribute of a variable.
pub(crate) fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(value) => Some(value),
        _ => None,
    }
}

/// Helper to get a numeric global attribute of a file.
pub(crate) fn get_global_f64_attr(file: &netcdf::File, name: &str) -> Option<f64> {
    if !file.attributes().any(|attr| attr.name() == name) {
        return None;
    }
    let attr_value = file.attribute(name)?.value().ok()?;
    f64::try_from(attr_value).ok()
}

/// Helper to get a text global attribute of a file.
pub(crate) fn get_global_string_attr(file: &netcdf::File, name: &str) -> Option<String> {
    if !file.attributes().any(|attr| attr.name() == name) {
        return None;
    }
    match file.attribute(name)?.value().ok()? {
        netcdf::AttributeValue::Str(value) => Some(value),
        _ => None,
    }
}
