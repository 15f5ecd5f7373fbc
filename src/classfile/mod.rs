//! Class file parsing
//!
//! A minimal reader for the JVM class-file format, covering exactly what
//! header generation needs: names, numeric constants and native methods.

pub mod constant_pool;
pub mod reader;
pub mod testutil;

pub use constant_pool::{Constant, ConstantPool};
pub use reader::ClassReader;

use crate::domain::model::ClassMetaInfo;
use crate::error::JavahResult;

/// `ACC_STATIC` access flag
pub const ACC_STATIC: u16 = 0x0008;
/// `ACC_NATIVE` access flag
pub const ACC_NATIVE: u16 = 0x0100;

/// Parse raw class file bytes into header-relevant metadata.
pub fn parse_class(data: &[u8]) -> JavahResult<ClassMetaInfo> {
    ClassReader::new(data).parse()
}
