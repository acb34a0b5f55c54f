// Copyright @yucwang 2026

//! Uncompressed true-color TGA dump of the display buffer.

use std::fs::File;
use std::io::{ BufReader, BufWriter, Read, Write };
use std::path::Path;

use byteorder::{ LittleEndian, ReadBytesExt, WriteBytesExt };

use crate::core::error::{ RenderError, Result };

const IMAGE_TYPE_TRUE_COLOR: u8 = 2;

/// Decoded TGA header fields that vary between images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TgaHeader {
    pub width: u16,
    pub height: u16,
    pub pixel_depth: u8,
    pub descriptor: u8,
}

impl TgaHeader {
    pub fn channels(&self) -> usize {
        (self.pixel_depth / 8) as usize
    }
}

/// Writes the 18 byte header followed by `pixels` unchanged.
pub fn write_tga<W: Write>(writer: &mut W, width: usize, height: usize, channels: usize,
                           pixels: &[u8]) -> Result<()> {
    if width > u16::MAX as usize || height > u16::MAX as usize {
        return Err(RenderError::ImageTooLarge { width, height });
    }
    let expected = width * height * channels;
    if pixels.len() != expected {
        return Err(RenderError::Encode(
            format!("expected {} bytes for {}x{}x{}, got {}", expected, width, height, channels,
                    pixels.len())));
    }

    writer.write_u8(0)?; // id length
    writer.write_u8(0)?; // colormap type
    writer.write_u8(IMAGE_TYPE_TRUE_COLOR)?;
    writer.write_u16::<LittleEndian>(0)?; // colormap index
    writer.write_u16::<LittleEndian>(0)?; // colormap length
    writer.write_u8(0)?; // colormap entry size
    writer.write_u16::<LittleEndian>(0)?; // x origin
    writer.write_u16::<LittleEndian>(0)?; // y origin
    writer.write_u16::<LittleEndian>(width as u16)?;
    writer.write_u16::<LittleEndian>(height as u16)?;
    writer.write_u8((channels * 8) as u8)?;
    writer.write_u8(if channels == 4 { 8 } else { 0 })?;
    writer.write_all(pixels)?;
    Ok(())
}

pub fn write_tga_file(path: &Path, width: usize, height: usize, channels: usize,
                      pixels: &[u8]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_tga(&mut writer, width, height, channels, pixels)?;
    writer.flush()?;
    log::info!("TGA written to: {}.", path.display());
    Ok(())
}

pub fn read_tga_header<R: Read>(reader: &mut R) -> Result<TgaHeader> {
    let id_length = reader.read_u8()?;
    let _colormap_type = reader.read_u8()?;
    let image_type = reader.read_u8()?;
    if image_type != IMAGE_TYPE_TRUE_COLOR {
        return Err(RenderError::Encode(format!("unsupported TGA image type {}", image_type)));
    }
    let _colormap_index = reader.read_u16::<LittleEndian>()?;
    let _colormap_length = reader.read_u16::<LittleEndian>()?;
    let _colormap_entry_size = reader.read_u8()?;
    let _x_origin = reader.read_u16::<LittleEndian>()?;
    let _y_origin = reader.read_u16::<LittleEndian>()?;
    let width = reader.read_u16::<LittleEndian>()?;
    let height = reader.read_u16::<LittleEndian>()?;
    let pixel_depth = reader.read_u8()?;
    let descriptor = reader.read_u8()?;

    let mut id = vec![0u8; id_length as usize];
    reader.read_exact(&mut id)?;
    Ok(TgaHeader { width, height, pixel_depth, descriptor })
}

/// Reads back a file produced by `write_tga`.
pub fn read_tga<R: Read>(reader: &mut R) -> Result<(TgaHeader, Vec<u8>)> {
    let header = read_tga_header(reader)?;
    let mut pixels = vec![0u8; header.width as usize * header.height as usize * header.channels()];
    reader.read_exact(&mut pixels)?;
    Ok((header, pixels))
}

pub fn read_tga_file(path: &Path) -> Result<(TgaHeader, Vec<u8>)> {
    let mut reader = BufReader::new(File::open(path)?);
    read_tga(&mut reader)
}
