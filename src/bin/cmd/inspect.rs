// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect command - show track file information.

use std::path::PathBuf;

use clap::Args;

use crate::common::{format_bytes, Result};
use j2kwrap::container::TrackFileReader;
use j2kwrap::{ContainerReader, Ul};

/// Show the descriptor, identification and frame count of a track file.
#[derive(Args, Clone, Debug)]
pub struct InspectCmd {
    /// Input track file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Also list the size of every frame
    #[arg(long)]
    frames: bool,
}

impl InspectCmd {
    pub fn run(self) -> Result<()> {
        let reader = TrackFileReader::open_for_read(&self.input)?;
        if self.json {
            print_json(&reader, self.frames)
        } else {
            print_text(&reader, self.frames);
            Ok(())
        }
    }
}

fn frame_sizes(reader: &TrackFileReader) -> Vec<usize> {
    (0..reader.frame_count())
        .filter_map(|i| reader.frame(i).map(<[u8]>::len))
        .collect()
}

fn print_json(reader: &TrackFileReader, with_frames: bool) -> Result<()> {
    let mut value = serde_json::json!({
        "file": reader.path().display().to_string(),
        "file_size": reader.file_size(),
        "edit_rate": reader.edit_rate(),
        "frame_count": reader.frame_count(),
        "index_segments": reader.index_segment_count(),
        "index_in_footer": reader.index_in_footer(),
        "identification": reader.writer_info(),
        "descriptor": reader.descriptor(),
        "sub_descriptor": reader.sub_descriptor(),
    });
    if with_frames {
        value["frame_sizes"] = serde_json::json!(frame_sizes(reader));
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn label(ul: &Ul) -> String {
    match ul.name() {
        Some(name) => format!("{name} ({ul})"),
        None => ul.to_string(),
    }
}

fn print_text(reader: &TrackFileReader, with_frames: bool) {
    let info = reader.writer_info();
    let descriptor = reader.descriptor();

    println!("=== {} ===", reader.path().display());
    println!("Size: {}", format_bytes(reader.file_size()));
    println!("Edit rate: {}", reader.edit_rate());
    println!("Frames: {}", reader.frame_count());
    println!(
        "Index: {} segment(s) {}",
        reader.index_segment_count(),
        if reader.index_in_footer() {
            "in footer"
        } else {
            "following essence"
        }
    );

    println!();
    println!("Identification:");
    println!("  Company: {}", info.company_name);
    println!("  Product: {} {}", info.product_name, info.product_version);
    println!("  Product UUID: {}", info.product_uuid);
    println!("  Asset UUID: {}", info.asset_uuid);

    println!();
    println!("Descriptor: {}", descriptor.shape);
    println!(
        "  Stored size: {}x{}",
        descriptor.stored_width, descriptor.stored_height
    );
    println!("  Components: {}", descriptor.component_scheme());
    println!("  Component depth: {}", descriptor.component_depth);
    println!(
        "  Reference levels: {}..{}",
        descriptor.component_min_ref, descriptor.component_max_ref
    );
    println!(
        "  Picture coding: {}",
        label(&descriptor.picture_essence_coding)
    );
    println!(
        "  Transfer characteristic: {}",
        label(&descriptor.transfer_characteristic)
    );
    println!("  Color primaries: {}", label(&descriptor.color_primaries));
    if let Some(cdci) = &descriptor.cdci {
        println!("  Coding equations: {}", label(&cdci.coding_equations));
        println!(
            "  Subsampling: {}:{}",
            cdci.horizontal_subsampling, cdci.vertical_subsampling
        );
        println!("  Color range: {}", cdci.color_range);
    }

    if with_frames {
        println!();
        println!("Frames:");
        for (index, size) in frame_sizes(reader).into_iter().enumerate() {
            println!("  [{index:06}] {size} bytes");
        }
    }
}
