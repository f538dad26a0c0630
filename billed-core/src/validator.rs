//! Receipt file-name gate.
//!
//! Only the extension is checked. A `.png` that is not a PNG passes, and so
//! does anything else renamed to one of the accepted extensions.

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub const INVALID_EXTENSION_MESSAGE: &str =
    "Invalid file extension. Please choose a jpg, jpeg, or png file.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Accepted { extension: String },
    Rejected { extension: String },
}

impl Validation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Validation::Accepted { .. })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileValidator;

impl FileValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, file_name: &str) -> Validation {
        let extension = extension_of(file_name);
        if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            Validation::Accepted { extension }
        } else {
            Validation::Rejected { extension }
        }
    }
}

/// Lower-cased text after the last `.`; the whole name when there is none.
pub fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .unwrap_or(file_name)
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_image_extensions_in_any_case() {
        let validator = FileValidator::new();
        for name in [
            "file.png",
            "file.PNG",
            "scan.jpg",
            "scan.JpG",
            "photo.jpeg",
            "archive.tar.JPEG",
        ] {
            assert!(validator.validate(name).is_accepted(), "{name}");
        }
    }

    #[test]
    fn rejects_everything_else() {
        let validator = FileValidator::new();
        for name in ["file.pdf", "file.png.pdf", "receipt", "file.", "file.gif", ""] {
            assert!(!validator.validate(name).is_accepted(), "{name}");
        }
    }

    #[test]
    fn extension_is_text_after_last_dot() {
        assert_eq!(extension_of("a.b.PnG"), "png");
        assert_eq!(extension_of("noext"), "noext");
        assert_eq!(extension_of("trailing."), "");
    }

    #[test]
    fn bare_name_is_its_own_extension() {
        assert!(FileValidator::new().validate("PNG").is_accepted());
    }

    #[test]
    fn mismatched_content_is_not_detected() {
        let validation = FileValidator::new().validate("malware.exe.jpg");
        assert_eq!(
            validation,
            Validation::Accepted {
                extension: "jpg".to_string()
            }
        );
    }
}
