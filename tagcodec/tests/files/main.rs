#![allow(missing_docs)]

mod aiff;
mod asf;
mod dff;
mod dsf;
mod flac;
mod front;
mod mp4;
pub(crate) mod util;
mod wav;
