use actix_multipart::{Field, Multipart};
use futures::TryStreamExt;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::db::NewHotel;
use crate::error::AppError;
use crate::Result;

/// Form field holding the picture.
pub const IMAGE_FIELD: &str = "image";

/// Largest accepted text field, in bytes.
pub const MAX_TEXT_FIELD_BYTES: usize = 1024 * 1024;

/// Hotel form as submitted, with the picture already written to disk.
#[derive(Debug)]
pub struct HotelForm {
    pub hotel: NewHotel,
    /// Where the picture landed, if one was sent.
    pub stored_image: Option<PathBuf>,
}

impl HotelForm {
    /// Removes the stored picture; used when the record is not saved.
    pub async fn discard(self) {
        remove_upload(self.stored_image).await;
    }
}

pub(crate) async fn remove_upload(path: Option<PathBuf>) {
    if let Some(path) = path {
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!("Could not remove orphaned upload {}: {}", path.display(), e);
        }
    }
}

/// `<uuid>.<ext>`, keeping the client's extension when it is plain
/// alphanumeric.
pub fn stored_filename(original: &str) -> String {
    let ext = Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase());

    match ext {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    }
}

async fn read_text(field: &mut Field) -> Result<String> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if bytes.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(AppError::ValidationError(format!(
                "Form fields are limited to {} bytes",
                MAX_TEXT_FIELD_BYTES
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    String::from_utf8(bytes).map_err(|_| AppError::ValidationError("Form fields must be UTF-8".into()))
}

async fn write_file(field: &mut Field, path: &Path) -> Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    while let Some(chunk) = field.try_next().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}

async fn drain(field: &mut Field) -> Result<()> {
    while field.try_next().await?.is_some() {}
    Ok(())
}

fn build_hotel(mut text: HashMap<String, String>, image: String) -> Result<NewHotel> {
    let name = text.remove("name").unwrap_or_default().trim().to_string();
    if name.is_empty() {
        return Err(AppError::ValidationError("Hotel name is required".into()));
    }

    let raw_price = text.remove("price").unwrap_or_default();
    let price = raw_price
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or_else(|| AppError::ValidationError(format!("Invalid price: {:?}", raw_price)))?;

    Ok(NewHotel {
        name,
        location: text.remove("location").unwrap_or_default().trim().to_string(),
        price,
        description: text.remove("description").unwrap_or_default(),
        image,
    })
}

#[derive(Default)]
struct FormParts {
    text: HashMap<String, String>,
    image: String,
    stored_image: Option<PathBuf>,
}

async fn read_parts(payload: &mut Multipart, upload_dir: &Path, parts: &mut FormParts) -> Result<()> {
    while let Some(mut field) = payload.try_next().await? {
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let filename = disposition.get_filename().map(str::to_string);

        match filename {
            Some(original) if name == IMAGE_FIELD && parts.stored_image.is_none() && !original.is_empty() => {
                tokio::fs::create_dir_all(upload_dir).await?;
                let filename = stored_filename(&original);
                let path = upload_dir.join(&filename);
                parts.stored_image = Some(path.clone());
                write_file(&mut field, &path).await?;
                debug!("Stored upload {} as {}", original, filename);
                parts.image = filename;
            }
            Some(_) => drain(&mut field).await?,
            None => {
                let value = read_text(&mut field).await?;
                parts.text.insert(name, value);
            }
        }
    }
    Ok(())
}

/// Reads the multipart hotel form. On a validation failure any picture
/// already written is removed again.
pub async fn read_hotel_form(mut payload: Multipart, upload_dir: &Path) -> Result<HotelForm> {
    let mut parts = FormParts::default();
    let read = read_parts(&mut payload, upload_dir, &mut parts).await;

    match read.and_then(|_| build_hotel(parts.text, parts.image)) {
        Ok(hotel) => Ok(HotelForm { hotel, stored_image: parts.stored_image }),
        Err(e) => {
            remove_upload(parts.stored_image).await;
            Err(e)
        }
    }
}
