//! IDX image/label decoding (MNIST and its derivatives).
//!
//! # IDX3 image file
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x03        (number of dimensions)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (big-endian u32)
//! bytes 12-15:  cols        (big-endian u32)
//! bytes 16..:   N * rows * cols pixels, row-major
//! ```
//!
//! # IDX1 label file
//! ```text
//! bytes  0-3:   0x00 0x00 0x08 0x01
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N class indices, one byte each
//! ```

use std::path::Path;

use log::info;

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};

const IMAGE_HEADER_LEN: usize = 16;
const LABEL_HEADER_LEN: usize = 8;

/// Decodes an image/label IDX pair into a [`Dataset`]; pixels are scaled by
/// 1/255 into `[0, 1]`.
pub fn parse_idx_pair(image_bytes: &[u8], label_bytes: &[u8], n_classes: usize) -> Result<Dataset> {
    check_magic("image", image_bytes, IMAGE_HEADER_LEN, 0x03)?;
    check_magic("label", label_bytes, LABEL_HEADER_LEN, 0x01)?;

    let n_items = read_u32(image_bytes, 4);
    let rows = read_u32(image_bytes, 8);
    let cols = read_u32(image_bytes, 12);
    let label_count = read_u32(label_bytes, 4);

    if label_count != n_items {
        return Err(Error::InvalidData(format!(
            "image file declares {n_items} items but label file declares {label_count}"
        )));
    }

    let n_pixels = rows
        .checked_mul(cols)
        .filter(|&n| n > 0)
        .ok_or_else(|| Error::InvalidData(format!("bad image dimensions {rows}x{cols}")))?;
    let image_len = n_items
        .checked_mul(n_pixels)
        .and_then(|n| n.checked_add(IMAGE_HEADER_LEN))
        .ok_or_else(|| Error::InvalidData("image data length overflows usize".into()))?;

    if image_bytes.len() < image_len {
        return Err(Error::InvalidData(format!(
            "image file declares {n_items} items of {rows}x{cols} pixels but is only {} bytes",
            image_bytes.len()
        )));
    }
    if label_bytes.len() < LABEL_HEADER_LEN + n_items {
        return Err(Error::InvalidData(format!(
            "label file declares {n_items} labels but is only {} bytes",
            label_bytes.len()
        )));
    }

    let inputs = image_bytes[IMAGE_HEADER_LEN..image_len]
        .chunks_exact(n_pixels)
        .map(|chunk| chunk.iter().map(|&px| px as f64 / 255.0).collect())
        .collect();
    let labels = label_bytes[LABEL_HEADER_LEN..LABEL_HEADER_LEN + n_items]
        .iter()
        .map(|&y| y as usize)
        .collect();

    Dataset::new(inputs, labels, n_classes)
}

/// Reads and decodes an IDX pair from disk.
pub fn load_idx_pair<P: AsRef<Path>>(images: P, labels: P, n_classes: usize) -> Result<Dataset> {
    let image_bytes = std::fs::read(images.as_ref())?;
    let label_bytes = std::fs::read(labels.as_ref())?;
    let dataset = parse_idx_pair(&image_bytes, &label_bytes, n_classes)?;
    info!(
        "loaded {} samples of width {} from {}",
        dataset.len(),
        dataset.input_size(),
        images.as_ref().display()
    );
    Ok(dataset)
}

fn check_magic(kind: &str, bytes: &[u8], header_len: usize, dims: u8) -> Result<()> {
    if bytes.len() < header_len {
        return Err(Error::InvalidData(format!(
            "IDX {kind} file too short: expected at least {header_len} header bytes, got {}",
            bytes.len()
        )));
    }
    if bytes[..4] != [0x00, 0x00, 0x08, dims] {
        return Err(Error::InvalidData(format!(
            "IDX {kind} file: bad magic {:02X?}, expected [00, 00, 08, {dims:02X}]",
            &bytes[..4]
        )));
    }
    Ok(())
}

fn read_u32(bytes: &[u8], offset: usize) -> usize {
    u32::from_be_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
        as usize
}
