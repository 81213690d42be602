//! Run directory resolution and result file emission

pub mod run_dir;
pub mod table;
pub mod writer;

pub use run_dir::RunDirectory;
pub use table::{Cell, ResultTable};
pub use writer::{result_filename, ResultKind, ResultWriter};
