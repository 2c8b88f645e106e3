//! Bitmap blitting.
//!
//! A bitmap borrows vertically bit-packed 1bpp pixel data: one byte per
//! column per 8-row band, band-major, LSB at the top of each band. Glyph
//! and image assets ship in this layout so a blit degenerates to a single
//! backend `set_area` call.
//!
//! The clipped variant intersects the bitmap with a viewport, recomputes
//! the visible sub-rectangle's offset into the source, and streams it
//! through a small staging buffer in column batches, so memory stays
//! bounded no matter how large the image is. Rows that start off a byte
//! boundary are reassembled from two adjacent source bytes with a
//! shift-and-carry; the carry term is dropped at the bitmap's last band.

use crate::device::{Device, PanelBackend};
use crate::geometry::{Point, Rect, Size};
use crate::transport::TransportError;

/// Staging buffer size used when the caller does not pick one.
pub const DEFAULT_STAGING_CAPACITY: usize = 64;

/// A positioned 1bpp bitmap borrowing its packed pixel data.
#[derive(Debug, Clone, Copy)]
pub struct Bitmap<'a> {
    pub origin: Point,
    pub size: Size,
    pub data: &'a [u8],
}

impl<'a> Bitmap<'a> {
    pub const fn new(origin: Point, size: Size, data: &'a [u8]) -> Self {
        Self { origin, size, data }
    }
}

/// Blit the whole bitmap at its origin. Parts hanging past the panel edge
/// are truncated by the backend.
pub fn draw_bitmap<B: PanelBackend>(
    dev: &mut Device<B>,
    bitmap: &Bitmap<'_>,
) -> Result<(), TransportError> {
    if bitmap.data.is_empty() {
        return Ok(());
    }
    let w = bitmap.size.width as u16;
    let h = bitmap.size.height as u16;
    dev.set_area(bitmap.origin.x, bitmap.origin.y, w, h, bitmap.data);
    if dev.immediate_draw() {
        dev.update_area(bitmap.origin.x, bitmap.origin.y, w, h)?;
    }
    Ok(())
}

/// Blit only the part of the bitmap inside `viewport`, with the default
/// staging capacity. The viewport's bottom-right corner is exclusive.
pub fn draw_bitmap_clipped<B: PanelBackend>(
    dev: &mut Device<B>,
    bitmap: &Bitmap<'_>,
    viewport: &Rect,
) -> Result<(), TransportError> {
    draw_bitmap_clipped_with(dev, bitmap, viewport, DEFAULT_STAGING_CAPACITY)
}

/// Clipped blit with a caller-chosen staging capacity in bytes. The buffer
/// is grown to hold at least one column when the capacity is too small for
/// the visible height.
pub fn draw_bitmap_clipped_with<B: PanelBackend>(
    dev: &mut Device<B>,
    bitmap: &Bitmap<'_>,
    viewport: &Rect,
    staging_capacity: usize,
) -> Result<(), TransportError> {
    if bitmap.data.is_empty() {
        return Ok(());
    }

    let img_left = i32::from(bitmap.origin.x);
    let img_top = i32::from(bitmap.origin.y);
    let img_right = img_left + bitmap.size.width as i32;
    let img_bottom = img_top + bitmap.size.height as i32;

    let clip = viewport.normalized();
    let clip_left = i32::from(clip.tl.x);
    let clip_top = i32::from(clip.tl.y);
    let clip_right = i32::from(clip.br.x);
    let clip_bottom = i32::from(clip.br.y);

    if img_right <= clip_left
        || img_left >= clip_right
        || img_bottom <= clip_top
        || img_top >= clip_bottom
    {
        return Ok(());
    }

    let visible_left = img_left.max(clip_left);
    let visible_top = img_top.max(clip_top);
    let visible_right = img_right.min(clip_right);
    let visible_bottom = img_bottom.min(clip_bottom);

    let visible_width = (visible_right - visible_left) as usize;
    let visible_height = (visible_bottom - visible_top) as usize;
    if visible_width == 0 || visible_height == 0 {
        return Ok(());
    }

    // Nothing was clipped away: skip the staging path entirely.
    if visible_left == img_left
        && visible_top == img_top
        && visible_right == img_right
        && visible_bottom == img_bottom
    {
        return draw_bitmap(dev, bitmap);
    }

    let offset_x = (visible_left - img_left) as usize;
    let offset_y = (visible_top - img_top) as usize;

    let bytes_per_column = visible_height.div_ceil(8);
    let columns_per_batch = (staging_capacity / bytes_per_column).max(1);
    let mut staging = vec![0u8; bytes_per_column * columns_per_batch];

    let src_width = bitmap.size.width as usize;
    let src_bands = (bitmap.size.height as usize).div_ceil(8);
    let bit_offset = offset_y % 8;

    let mut batch_start = 0;
    while batch_start < visible_width {
        let batch_cols = columns_per_batch.min(visible_width - batch_start);

        for x in 0..batch_cols {
            let src_x = offset_x + batch_start + x;
            for byte_y in 0..bytes_per_column {
                let src_band = offset_y / 8 + byte_y;
                let staged = if src_band < src_bands && src_x < src_width {
                    let src = bitmap.data[src_band * src_width + src_x];
                    if bit_offset == 0 {
                        src
                    } else {
                        let mut byte = src >> bit_offset;
                        if src_band + 1 < src_bands {
                            let next = bitmap.data[(src_band + 1) * src_width + src_x];
                            byte |= next << (8 - bit_offset);
                        }
                        byte
                    }
                } else {
                    0
                };
                staging[byte_y * batch_cols + x] = staged;
            }
        }

        let batch_x = (visible_left + batch_start as i32) as u16;
        dev.set_area(
            batch_x,
            visible_top as u16,
            batch_cols as u16,
            visible_height as u16,
            &staging,
        );
        if dev.immediate_draw() {
            dev.update_area(
                batch_x,
                visible_top as u16,
                batch_cols as u16,
                visible_height as u16,
            )?;
        }

        batch_start += batch_cols;
    }

    Ok(())
}
