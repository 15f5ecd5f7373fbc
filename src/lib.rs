//! javah - JNI Native Header Generator
//!
//! A re-implementation of the historical `javah` tool: parses compiled Java
//! class files, collects `native` methods and static numeric constants, and
//! emits C headers with JNI-mangled function declarations.

pub mod app;
pub mod classfile;
pub mod cli;
pub mod domain;
pub mod error;
pub mod generate;
pub mod search;

// Re-export commonly used types
pub use app::{JavahTask, OutputTarget};
pub use domain::model::{
    ClassMetaInfo, ClassName, ConstantValue, JavaType, MethodDescriptor, NativeMethod,
};
pub use error::{JavahError, JavahResult};
pub use generate::HeaderGenerator;
