pub mod constants;
pub mod cursor;
pub mod error;
pub mod format;
pub mod line_plot;
pub mod sync;
pub mod video;

#[cfg(test)]
pub(crate) mod test_stream;
