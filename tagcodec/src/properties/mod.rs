//! Generic audio properties
//!
//! Every format reads its own properties struct (see [`DsfProperties`](crate::dsd::dsf::DsfProperties),
//! [`FlacProperties`](crate::flac::FlacProperties), etc.), which can be converted into the
//! format-agnostic [`AudioProperties`].

mod audio_properties;

pub use audio_properties::AudioProperties;
