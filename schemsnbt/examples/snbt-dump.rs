use std::io;

use schemnbt::{decode_root_from_reader, Tag};

//
// This example dumps an NBT file from stdin as SNBT text, gzip framed or not.
//

fn main() {
    let stdin = io::stdin();
    let root = match decode_root_from_reader(stdin.lock()) {
        Ok(root) => root,
        Err(e) => {
            println!("{:?}", e);
            return;
        }
    };

    let (name, compound) = root.into_parts();
    println!("{:?}", name);
    schemsnbt::to_writer(io::stdout(), &Tag::Compound(compound)).unwrap();
    println!();
}
