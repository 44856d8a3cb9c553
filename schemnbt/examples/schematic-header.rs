#![allow(dead_code)]
use schemnbt::error::Result;
use schemnbt::{decode_root_from_reader, from_compound, IntArray};
use serde::Deserialize;

// This example prints the header of a Sponge schematic (.schem) file. The
// file is gzip framed, which decoding detects on its own.

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct Header {
    version: i32,
    data_version: Option<i32>,
    width: i16,
    height: i16,
    length: i16,
    offset: Option<IntArray>,
    palette_max: Option<i32>,
}

fn main() {
    let args: Vec<_> = std::env::args().skip(1).collect();
    let file = std::fs::File::open(&args[0]).unwrap();

    let root = decode_root_from_reader(file).unwrap();
    println!("root name: {:?}", root.name());

    let header: Result<Header> = from_compound(&root);
    println!("{:?}", header);
}
