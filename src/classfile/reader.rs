//! Class file reader
//!
//! Parses just enough of the class-file format for header generation: the
//! constant pool, the class and superclass names, static fields carrying a
//! numeric `ConstantValue`, and `native` method declarations. Code, debug
//! and framework attributes are skipped by length.

use tracing::trace;

use crate::classfile::constant_pool::{Constant, ConstantPool};
use crate::classfile::{ACC_NATIVE, ACC_STATIC};
use crate::domain::model::{ClassMetaInfo, ClassName, ConstantValue, NamedConstant, NativeMethod};
use crate::error::{JavahError, JavahResult};

const MAGIC: u32 = 0xCAFE_BABE;

/// Cursor over raw class file bytes with checked big-endian reads.
pub struct ClassReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ClassReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn bytes(&mut self, wanted: usize) -> JavahResult<&'a [u8]> {
        let end = self.pos.checked_add(wanted).filter(|&end| end <= self.data.len());
        match end {
            Some(end) => {
                let slice = &self.data[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => Err(JavahError::TruncatedClassFile {
                offset: self.pos,
                wanted,
            }),
        }
    }

    fn u8(&mut self) -> JavahResult<u8> {
        Ok(self.bytes(1)?[0])
    }

    fn u16(&mut self) -> JavahResult<u16> {
        let b = self.bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> JavahResult<u32> {
        let b = self.bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn skip(&mut self, count: usize) -> JavahResult<()> {
        self.bytes(count).map(|_| ())
    }

    /// Parse the class file and collect header-relevant metadata.
    pub fn parse(mut self) -> JavahResult<ClassMetaInfo> {
        let magic = self.u32()?;
        if magic != MAGIC {
            return Err(JavahError::BadMagic { magic });
        }
        let minor = self.u16()?;
        let major = self.u16()?;
        trace!(major, minor, "class file version");

        let pool = self.read_constant_pool()?;

        let _access_flags = self.u16()?;
        let this_class = self.u16()?;
        let super_class = self.u16()?;

        let name = ClassName::of_internal_name(pool.class_name(this_class)?)?;
        let super_name = if super_class == 0 {
            None
        } else {
            Some(ClassName::of_internal_name(pool.class_name(super_class)?)?)
        };

        let interface_count = self.u16()?;
        self.skip(interface_count as usize * 2)?;

        let constants = self.read_fields(&pool)?;
        let methods = self.read_methods(&pool)?;

        Ok(ClassMetaInfo {
            name,
            super_name,
            constants,
            methods,
        })
    }

    fn read_constant_pool(&mut self) -> JavahResult<ConstantPool> {
        let count = self.u16()?;
        let mut entries = Vec::with_capacity(count as usize);
        entries.push(Constant::Unusable); // index 0 is reserved

        while entries.len() < count as usize {
            let index = entries.len() as u16;
            let tag = self.u8()?;
            let entry = match tag {
                1 => {
                    let length = self.u16()?;
                    let raw = self.bytes(length as usize)?;
                    Constant::Utf8(decode_modified_utf8(raw)?)
                }
                3 => Constant::Integer(self.u32()? as i32),
                4 => Constant::Float(f32::from_bits(self.u32()?)),
                5 => Constant::Long(((self.u32()? as u64) << 32 | self.u32()? as u64) as i64),
                6 => Constant::Double(f64::from_bits(
                    (self.u32()? as u64) << 32 | self.u32()? as u64,
                )),
                7 => Constant::Class(self.u16()?),
                8 => Constant::String(self.u16()?),
                9 => Constant::FieldRef {
                    class: self.u16()?,
                    name_and_type: self.u16()?,
                },
                10 => Constant::MethodRef {
                    class: self.u16()?,
                    name_and_type: self.u16()?,
                },
                11 => Constant::InterfaceMethodRef {
                    class: self.u16()?,
                    name_and_type: self.u16()?,
                },
                12 => Constant::NameAndType {
                    name: self.u16()?,
                    descriptor: self.u16()?,
                },
                15 => Constant::MethodHandle {
                    kind: self.u8()?,
                    reference: self.u16()?,
                },
                16 => Constant::MethodType(self.u16()?),
                17 => Constant::Dynamic {
                    bootstrap: self.u16()?,
                    name_and_type: self.u16()?,
                },
                18 => Constant::InvokeDynamic {
                    bootstrap: self.u16()?,
                    name_and_type: self.u16()?,
                },
                19 => Constant::Module(self.u16()?),
                20 => Constant::Package(self.u16()?),
                tag => return Err(JavahError::UnknownConstantTag { tag, index }),
            };
            let two_slots = matches!(entry, Constant::Long(_) | Constant::Double(_));
            entries.push(entry);
            if two_slots {
                entries.push(Constant::Unusable);
            }
        }

        Ok(ConstantPool::new(entries))
    }

    /// Read the field table, collecting static fields whose `ConstantValue`
    /// is numeric, in declaration order.
    fn read_fields(&mut self, pool: &ConstantPool) -> JavahResult<Vec<NamedConstant>> {
        let count = self.u16()?;
        let mut constants = Vec::new();
        for _ in 0..count {
            let access = self.u16()?;
            let name_index = self.u16()?;
            let _descriptor_index = self.u16()?;
            let constant_index = self.read_attributes(pool)?;

            if access & ACC_STATIC == 0 {
                continue;
            }
            let Some(constant_index) = constant_index else {
                continue;
            };
            let value = match pool.get(constant_index)? {
                Constant::Integer(v) => ConstantValue::Int(*v),
                Constant::Long(v) => ConstantValue::Long(*v),
                Constant::Float(v) => ConstantValue::Float(*v),
                Constant::Double(v) => ConstantValue::Double(*v),
                // String constants have no place in a C header
                _ => continue,
            };
            constants.push(NamedConstant {
                name: pool.utf8(name_index)?.to_string(),
                value,
            });
        }
        Ok(constants)
    }

    /// Read the method table, keeping `native` methods in declaration order.
    fn read_methods(&mut self, pool: &ConstantPool) -> JavahResult<Vec<NativeMethod>> {
        let count = self.u16()?;
        let mut methods = Vec::new();
        for _ in 0..count {
            let access = self.u16()?;
            let name_index = self.u16()?;
            let descriptor_index = self.u16()?;
            self.read_attributes(pool)?;

            if access & ACC_NATIVE != 0 {
                methods.push(NativeMethod::of(
                    pool.utf8(name_index)?,
                    pool.utf8(descriptor_index)?,
                    access & ACC_STATIC != 0,
                )?);
            }
        }
        Ok(methods)
    }

    /// Skip an attribute table, returning the `ConstantValue` index when one
    /// is present.
    fn read_attributes(&mut self, pool: &ConstantPool) -> JavahResult<Option<u16>> {
        let count = self.u16()?;
        let mut constant_index = None;
        for _ in 0..count {
            let name_index = self.u16()?;
            let length = self.u32()?;
            let payload = self.bytes(length as usize)?;
            if pool.utf8(name_index)? == "ConstantValue" && payload.len() == 2 {
                constant_index = Some(u16::from_be_bytes([payload[0], payload[1]]));
            }
        }
        Ok(constant_index)
    }
}

/// Decode the modified UTF-8 used in class files: 1-3 byte sequences
/// yielding UTF-16 code units, NUL encoded as `C0 80`, supplementary
/// characters as surrogate pairs.
fn decode_modified_utf8(bytes: &[u8]) -> JavahResult<String> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b & 0x80 == 0 {
            if b == 0 {
                return Err(JavahError::InvalidUtf8);
            }
            units.push(b as u16);
            i += 1;
        } else if b & 0xE0 == 0xC0 {
            let b2 = *bytes.get(i + 1).ok_or(JavahError::InvalidUtf8)?;
            if b2 & 0xC0 != 0x80 {
                return Err(JavahError::InvalidUtf8);
            }
            units.push(((b as u16 & 0x1F) << 6) | (b2 as u16 & 0x3F));
            i += 2;
        } else if b & 0xF0 == 0xE0 {
            let b2 = *bytes.get(i + 1).ok_or(JavahError::InvalidUtf8)?;
            let b3 = *bytes.get(i + 2).ok_or(JavahError::InvalidUtf8)?;
            if b2 & 0xC0 != 0x80 || b3 & 0xC0 != 0x80 {
                return Err(JavahError::InvalidUtf8);
            }
            units.push(((b as u16 & 0x0F) << 12) | ((b2 as u16 & 0x3F) << 6) | (b3 as u16 & 0x3F));
            i += 3;
        } else {
            return Err(JavahError::InvalidUtf8);
        }
    }
    String::from_utf16(&units).map_err(|_| JavahError::InvalidUtf8)
}
