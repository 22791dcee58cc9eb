mod compressed_bincode;
mod lz4_compression;

pub use compressed_bincode::BincodeCompression;
pub use lz4_compression::Lz4;

use serde::{Deserialize, Serialize};

/// An algorithm for:
///     1. compressing a specific type `Data` into type `CompressedData`
///     2. decompressing `CompressedData` back into `Data`
///
/// Both directions can fail, since compressed data usually comes from a file.
pub trait Compression: Sized {
    type Data;
    type CompressedData;

    fn compress(&self, data: &Self::Data) -> Result<Compressed<Self>, crate::ArchiveError>;
    fn decompress(compressed: &Self::CompressedData) -> Result<Self::Data, crate::ArchiveError>;
}

/// A value compressed with compression algorithm `A`.
#[derive(Clone, Deserialize, Serialize)]
#[serde(bound(
    serialize = "A::CompressedData: Serialize",
    deserialize = "A::CompressedData: Deserialize<'de>"
))]
pub struct Compressed<A>
where
    A: Compression,
{
    pub compressed_data: A::CompressedData,
    #[serde(skip)]
    marker: std::marker::PhantomData<A>,
}

impl<A> Compressed<A>
where
    A: Compression,
{
    pub fn new(compressed_data: A::CompressedData) -> Self {
        Self {
            compressed_data,
            marker: Default::default(),
        }
    }

    pub fn decompress(&self) -> Result<A::Data, crate::ArchiveError> {
        A::decompress(&self.compressed_data)
    }

    pub fn take(self) -> A::CompressedData {
        self.compressed_data
    }
}

/// A compression algorithm that acts directly on a slice of bytes.
pub trait BytesCompression {
    fn compress_bytes(&self, bytes: &[u8], compressed_bytes: impl std::io::Write) -> std::io::Result<()>;
    fn decompress_bytes(compressed_bytes: &[u8], bytes: &mut impl std::io::Write) -> std::io::Result<()>;
}
