// Domain layer - class names, type descriptors and the rules that validate them

pub mod model;
pub mod rules;
