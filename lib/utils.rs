//! Output helpers shared by the binaries.

use thiserror::Error;

pub use ndarray_npy::NpzWriter;

#[derive(Debug, Error)]
pub enum NpzError {
    #[error("couldn't create output file: {0}")]
    Io(#[from] std::io::Error),

    #[error("couldn't write array: {0}")]
    Npz(#[from] ndarray_npy::WriteNpzError),
}

/// Create a directory and all of its parents, returning a
/// [`std::io::Result`].
#[macro_export]
macro_rules! mkdir {
    ( $dir:expr ) => {
        std::fs::create_dir_all(&$dir)
    }
}

/// Write a set of named arrays to a `.npz` file, returning a
/// `Result<(), NpzError>`.
///
/// ```ignore
/// write_npz!(
///     outdir.join("grid.npz"),
///     arrays: {
///         "theta" => &theta,
///         "w" => &w,
///     }
/// )?;
/// ```
#[macro_export]
macro_rules! write_npz {
    (
        $filename:expr,
        arrays: { $( $key:literal => $arr:expr ),* $(,)? } $(,)?
    ) => {
        (|| -> Result<(), $crate::utils::NpzError> {
            let file = std::fs::File::create($filename)?;
            let mut npz = $crate::utils::NpzWriter::new(file);
            $( npz.add_array($key, $arr)?; )*
            npz.finish()?;
            Ok(())
        })()
    }
}
