pub mod filename;
pub mod status;
pub mod synth;

pub use status::ConversionStatus;
pub use synth::{DocumentSynthesizer, SynthesisError, TemplateSynthesizer};
