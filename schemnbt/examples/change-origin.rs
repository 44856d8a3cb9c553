//! This executable takes a path to a schematic file and writes a copy to
//! `out.schem` in the current directory, with the schematic's offset moved to
//! the origin and its palette indices repacked at the narrowest width.
//!
//! Palette indices live in a LongArray, densely packed. The width is read
//! from the `BitsPerBlock` entry when present.

use std::fs::File;

use schemnbt::{
    calcsize, decode_root_from_reader, encode_root_to_writer, IntArray, LongArray, Tag,
};

fn main() {
    let args: Vec<_> = std::env::args_os().collect();
    let file = File::open(&args[1]).unwrap();
    let mut root = decode_root_from_reader(file).unwrap();

    root.insert("Offset", IntArray::new(&[0, 0, 0]));

    let width = root
        .get("BitsPerBlock")
        .and_then(Tag::as_i64)
        .map(|w| w as u32);

    let indices: Option<Vec<u64>> = match (width, root.get("BlockStates")) {
        (Some(width), Some(Tag::LongArray(blocks))) => {
            Some(blocks.view(width).unwrap().iter().collect())
        }
        _ => None,
    };

    if let Some(indices) = indices {
        let signed: Vec<i64> = indices.iter().map(|&i| i as i64).collect();
        let narrow = calcsize(&signed);

        println!("repacking {} indices to {} bits", indices.len(), narrow);
        let repacked = LongArray::pack_list(&indices, Some(narrow)).unwrap();
        root.insert("BlockStates", repacked);
        root.insert("BitsPerBlock", narrow as i32);
    }

    let outfile = File::create("out.schem").unwrap();
    encode_root_to_writer(outfile, &root, true).unwrap();
}
