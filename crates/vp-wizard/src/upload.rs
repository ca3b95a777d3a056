use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::WizardError;

pub const MIN_UPLOAD_IMAGES: usize = 5;
pub const MAX_UPLOAD_IMAGES: usize = 20;
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Accepts either bare base64 or a full `data:<mime>;base64,<payload>` URL.
    pub fn from_base64(
        file_name: &str,
        content_type: Option<String>,
        data: &str,
    ) -> Result<Self, WizardError> {
        let (content_type, payload) = match data.strip_prefix("data:") {
            Some(rest) => match rest.split_once(";base64,") {
                Some((mime, payload)) => {
                    let mime = if mime.is_empty() { None } else { Some(mime.to_owned()) };
                    (content_type.or(mime), payload)
                }
                None => {
                    return Err(WizardError::InvalidEncoding {
                        file_name: file_name.to_owned(),
                    });
                }
            },
            None => (content_type, data),
        };

        let bytes = STANDARD
            .decode(payload.trim().as_bytes())
            .map_err(|_| WizardError::InvalidEncoding {
                file_name: file_name.to_owned(),
            })?;

        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() && ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    pub fn has_allowed_extension(&self) -> bool {
        self.extension()
            .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
    }

    pub fn mime_type(&self) -> String {
        if let Some(content_type) = self.content_type.as_deref() {
            if !content_type.trim().is_empty() {
                return content_type.to_owned();
            }
        }

        match self.extension().as_deref() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        }
        .to_owned()
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.bytes))
    }
}

pub fn validate_count(count: usize) -> Result<(), WizardError> {
    if count < MIN_UPLOAD_IMAGES {
        return Err(WizardError::TooFewImages { count });
    }
    if count > MAX_UPLOAD_IMAGES {
        return Err(WizardError::TooManyImages { count });
    }
    Ok(())
}

/// Checks a whole selection. Any failure rejects every file.
pub fn validate_selection(files: &[UploadedImage], max_total_bytes: usize) -> Result<(), WizardError> {
    validate_count(files.len())?;

    if let Some(bad) = files
        .iter()
        .find(|file| file.file_name.trim().is_empty() || !file.has_allowed_extension())
    {
        return Err(WizardError::UnsupportedFormat {
            file_name: bad.file_name.clone(),
        });
    }

    let total_bytes: usize = files.iter().map(|file| file.bytes.len()).sum();
    if total_bytes > max_total_bytes {
        return Err(WizardError::UploadTooLarge {
            total_bytes,
            limit: max_total_bytes,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(count: usize) -> Vec<UploadedImage> {
        (0..count)
            .map(|i| UploadedImage::new(format!("photo-{i}.png"), None, vec![1, 2, 3]))
            .collect()
    }

    #[test]
    fn count_bounds_are_inclusive() {
        assert_eq!(
            validate_selection(&images(4), DEFAULT_MAX_UPLOAD_BYTES),
            Err(WizardError::TooFewImages { count: 4 })
        );
        assert!(validate_selection(&images(5), DEFAULT_MAX_UPLOAD_BYTES).is_ok());
        assert!(validate_selection(&images(20), DEFAULT_MAX_UPLOAD_BYTES).is_ok());
        assert_eq!(
            validate_selection(&images(21), DEFAULT_MAX_UPLOAD_BYTES),
            Err(WizardError::TooManyImages { count: 21 })
        );
    }

    #[test]
    fn one_bad_extension_rejects_selection() {
        let mut files = images(6);
        files[3].file_name = "notes.txt".to_owned();
        assert_eq!(
            validate_selection(&files, DEFAULT_MAX_UPLOAD_BYTES),
            Err(WizardError::UnsupportedFormat {
                file_name: "notes.txt".to_owned()
            })
        );
    }

    #[test]
    fn size_limit_covers_whole_selection() {
        let files = images(5);
        assert_eq!(
            validate_selection(&files, 14),
            Err(WizardError::UploadTooLarge {
                total_bytes: 15,
                limit: 14
            })
        );
    }

    #[test]
    fn extensions_are_case_insensitive() {
        let file = UploadedImage::new("Portrait.JPEG", None, Vec::new());
        assert!(file.has_allowed_extension());
        assert_eq!(file.mime_type(), "image/jpeg");
        assert!(!UploadedImage::new("noextension", None, Vec::new()).has_allowed_extension());
    }

    #[test]
    fn decodes_bare_and_data_url_payloads() -> Result<(), WizardError> {
        let bare = UploadedImage::from_base64("a.png", None, "AQID")?;
        assert_eq!(bare.bytes, vec![1, 2, 3]);
        assert_eq!(bare.data_url(), "data:image/png;base64,AQID");

        let url = UploadedImage::from_base64("b.webp", None, "data:image/webp;base64,AQID")?;
        assert_eq!(url.content_type.as_deref(), Some("image/webp"));
        assert_eq!(url.bytes, vec![1, 2, 3]);

        assert_eq!(
            UploadedImage::from_base64("c.png", None, "***"),
            Err(WizardError::InvalidEncoding {
                file_name: "c.png".to_owned()
            })
        );
        Ok(())
    }
}
