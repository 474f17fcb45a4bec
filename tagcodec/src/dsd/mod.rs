//! DSD (Direct Stream Digital) containers
//!
//! Both carry an ID3v2 tag:
//!
//! * DSF (Sony's DSD Stream File) keeps it at the end of the file, pointed to by the header
//! * DFF (Philips' DSDIFF) keeps it in an `ID3 ` chunk of the `FRM8` form

pub mod dff;
pub mod dsf;

pub use dff::DffFile;
pub use dsf::DsfFile;
