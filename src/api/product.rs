//! Product Component (`G2Product_*`)

native_component! {
    /// Version and license information.
    pub struct Product {
        component: "product",
        prefix: "G2Product",
        extra: [],
    }

    /// Version JSON. The library owns the string; it is copied out.
    text version("version");
    /// License JSON. The library owns the string; it is copied out.
    text license("license");
    growable validate_license_file("validateLicenseFile", license_file_path: text);
    growable validate_license_string_base64("validateLicenseStringBase64", license_string: text);
}
