use std::convert::TryInto;
use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::error::{Error, Result};
use crate::TagKind;

pub(crate) trait WriteNbt: Write {
    fn write_kind(&mut self, kind: TagKind) -> Result<()> {
        self.write_u8(kind.id())?;
        Ok(())
    }

    fn write_size_prefixed_str(&mut self, s: &str) -> Result<()> {
        let len: u16 = s.len().try_into().map_err(|_| {
            Error::structural(format!("string of {} bytes is too long for NBT", s.len()))
        })?;
        self.write_u16::<BigEndian>(len)?;
        self.write_all(s.as_bytes())?;
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<()> {
        self.write_u32::<BigEndian>(
            len.try_into()
                .map_err(|_| Error::structural(format!("length {} too large", len)))?,
        )?;

        Ok(())
    }
}

impl<T> WriteNbt for T where T: Write {}
