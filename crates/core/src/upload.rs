//! Photo upload rules and the HTML result page that echoes submitted fields.

use image::ImageFormat;

/// MIME types accepted for the photo field.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

/// Default upload size limit (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Why an uploaded photo was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("Only image files (JPG/PNG/GIF) are allowed, got '{0}'")]
    UnsupportedType(String),

    #[error("File is too large ({size} bytes). Maximum is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("File content does not match its declared type '{0}'")]
    ContentMismatch(String),
}

/// Check an uploaded photo's declared type, size and magic bytes.
pub fn validate_image_upload(
    content_type: &str,
    data: &[u8],
    max_bytes: usize,
) -> Result<(), UploadRejection> {
    let content_type = content_type.trim().to_ascii_lowercase();
    if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
        return Err(UploadRejection::UnsupportedType(content_type));
    }

    if data.len() > max_bytes {
        return Err(UploadRejection::TooLarge {
            size: data.len(),
            max: max_bytes,
        });
    }

    let declared = ImageFormat::from_mime_type(&content_type);
    let actual = image::guess_format(data).ok();
    if declared.is_none() || declared != actual {
        return Err(UploadRejection::ContentMismatch(content_type));
    }

    Ok(())
}

/// Reduce a client-supplied file name to a safe basename.
///
/// Path components are dropped and anything outside `[A-Za-z0-9._-]` becomes
/// `_`. An empty result falls back to `upload`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// Text fields received alongside the photo. Absent fields render as `-`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedFields {
    pub name: Option<String>,
    pub age: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub gender: Option<String>,
    pub interests: Vec<String>,
    pub message: Option<String>,
}

impl SubmittedFields {
    /// Assign a multipart text field by its form name. Unknown names are
    /// ignored; `hobi` may repeat.
    pub fn set(&mut self, field: &str, value: String) {
        match field {
            "nama" => self.name = Some(value),
            "umur" => self.age = Some(value),
            "provinsi" => self.province = Some(value),
            "kota" => self.city = Some(value),
            "jk" => self.gender = Some(value),
            "hobi" | "hobi[]" => self.interests.push(value),
            "pesan" => self.message = Some(value),
            _ => {}
        }
    }
}

fn cell(value: &Option<String>) -> String {
    html_escape(value.as_deref().unwrap_or("-"))
}

/// Render the result page echoing every submitted field, HTML-escaped.
pub fn render_result_page(fields: &SubmittedFields, photo_url: Option<&str>) -> String {
    let interests = if fields.interests.is_empty() {
        "-".to_string()
    } else {
        fields
            .interests
            .iter()
            .map(|i| html_escape(i))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let photo = photo_url
        .map(|url| {
            format!(
                "<div class=\"photo\"><img src=\"{}\" alt=\"Photo\"></div>\n",
                html_escape(url)
            )
        })
        .unwrap_or_default();

    let rows = [
        ("Name", cell(&fields.name)),
        ("Age", format!("{} years", cell(&fields.age))),
        ("Province", cell(&fields.province)),
        ("City", cell(&fields.city)),
        ("Gender", cell(&fields.gender)),
        ("Interests", interests),
        ("Message", cell(&fields.message)),
    ]
    .iter()
    .map(|(label, value)| format!("<tr><td><strong>{label}:</strong></td><td>{value}</td></tr>"))
    .collect::<Vec<_>>()
    .join("\n");

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"UTF-8\"><title>Submitted data</title></head>\n<body>\n<h1>Submitted data</h1>\n{photo}<table>\n{rows}\n</table>\n<a href=\"/\">Back to form</a>\n</body>\n</html>\n"
    )
}

/// Render a minimal page carrying a single error alert.
pub fn render_error_page(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"UTF-8\"><title>Upload failed</title></head>\n<body>\n<div class=\"alert alert-danger\">{}</div>\n</body>\n</html>\n",
        html_escape(message)
    )
}
