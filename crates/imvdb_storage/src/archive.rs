//! The multi-grid archive file format.
//!
//! An archive is a sequence of grids sharing one value type:
//!
//! ```text
//! MAGIC (8 bytes)
//! ArchiveHeader { version, grid_count }                 (bincode)
//! for each grid:
//!     GridDescriptor { value_type, name, meta, payload_len }   (bincode)
//!     GridPayload { transform, background, nodes }              (bincode, payload_len bytes)
//! ```
//!
//! Tiles are stored as-is. Leaves are bincode serialized and then LZ4 compressed. Descriptors carry the payload length so a
//! reader can list every grid, and skip to one by name, without decoding any trees.
//!
//! Written metadata also contains the active voxel bounds (`file_bbox_min`, `file_bbox_max`) and `file_voxel_count`. These
//! describe the file rather than the grid, so they are dropped again when a grid is read.
//!
//! Nothing read from an archive is trusted: lengths are checked against the size of the stream and every node must sit on its
//! own node-aligned extent, otherwise reading fails with `ArchiveError::Corrupt`.

use crate::{
    registry, BincodeCompression, Compressed, Compression, GridValue, LeafNode, Lz4, MetaMap, Node, Tile, Tree,
    VolumeGrid, LEAF_INDEXER,
};

use imvdb_core::prelude::*;

use bincode::Options;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

pub const ARCHIVE_MAGIC: [u8; 8] = *b"IMVDB\x00\x0d\x0a";
pub const ARCHIVE_VERSION: u32 = 1;

pub const META_FILE_BBOX_MIN: &str = "file_bbox_min";
pub const META_FILE_BBOX_MAX: &str = "file_bbox_max";
pub const META_FILE_VOXEL_COUNT: &str = "file_voxel_count";

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("archive I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive encoding failed: {0}")]
    Codec(#[from] bincode::Error),
    #[error("not an archive (bad magic number)")]
    BadMagic,
    #[error("unsupported archive version {0}")]
    UnsupportedVersion(u32),
    #[error("grid value types are not registered; call registry::initialize first")]
    NotInitialized,
    #[error("grid value type \"{0}\" is not registered")]
    UnregisteredType(String),
    #[error("grid holds {found} values, expected {expected}")]
    WrongValueType { expected: &'static str, found: String },
    #[error("no grid named \"{0}\" in archive")]
    GridNotFound(String),
    #[error("corrupt archive: {0}")]
    Corrupt(String),
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ArchiveHeader {
    pub version: u32,
    pub grid_count: u32,
}

/// Everything about a stored grid except its transform and tree.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GridDescriptor {
    pub value_type: String,
    pub name: String,
    pub meta: MetaMap,
    pub payload_len: u64,
}

type CompressedLeaf<T> = Compressed<BincodeCompression<LeafNode<T>, Lz4>>;

#[derive(Deserialize, Serialize)]
#[serde(bound = "T: GridValue")]
enum NodeRecord<T>
where
    T: GridValue,
{
    Tile(Tile<T>),
    Leaf(CompressedLeaf<T>),
}

#[derive(Deserialize, Serialize)]
#[serde(bound = "T: GridValue")]
struct GridPayload<T>
where
    T: GridValue,
{
    transform: Transform,
    background: T,
    nodes: Vec<(Point3i, NodeRecord<T>)>,
}

fn check_registered(value_type: &str) -> Result<(), ArchiveError> {
    if !registry::is_initialized() {
        return Err(ArchiveError::NotInitialized);
    }
    if !registry::is_registered(value_type) {
        return Err(ArchiveError::UnregisteredType(value_type.to_owned()));
    }

    Ok(())
}

/// The encoding of `bincode::serialize`, refusing to decode more than `limit` bytes.
fn decode_options(limit: u64) -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(limit)
}

/// Writes grids into an archive.
pub struct ArchiveWriter<W> {
    writer: W,
    compression: Lz4,
}

impl<W> ArchiveWriter<W>
where
    W: Write,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            compression: Lz4::default(),
        }
    }

    /// Use `compression` for leaf nodes.
    pub fn with_compression(mut self, compression: Lz4) -> Self {
        self.compression = compression;

        self
    }

    /// Writes the whole archive and flushes it. Consumes the writer, since an archive holds exactly one header.
    pub fn write_grids<T>(mut self, grids: &[&VolumeGrid<T>]) -> Result<W, ArchiveError>
    where
        T: GridValue,
    {
        check_registered(T::TYPE_NAME)?;

        self.writer.write_all(&ARCHIVE_MAGIC)?;
        bincode::serialize_into(
            &mut self.writer,
            &ArchiveHeader {
                version: ARCHIVE_VERSION,
                grid_count: grids.len() as u32,
            },
        )?;

        for grid in grids.iter() {
            let payload = bincode::serialize(&self.encode_payload(grid)?)?;
            let descriptor = GridDescriptor {
                value_type: T::TYPE_NAME.to_owned(),
                name: grid.name(),
                meta: meta_with_file_stats(grid),
                payload_len: payload.len() as u64,
            };
            bincode::serialize_into(&mut self.writer, &descriptor)?;
            self.writer.write_all(&payload)?;

            tracing::debug!(
                "Wrote grid \"{}\" with {} nodes ({} payload bytes)",
                descriptor.name,
                grid.tree().node_count(),
                descriptor.payload_len
            );
        }
        self.writer.flush()?;

        Ok(self.writer)
    }

    fn encode_payload<T>(&self, grid: &VolumeGrid<T>) -> Result<GridPayload<T>, ArchiveError>
    where
        T: GridValue,
    {
        let tree = grid.tree();
        let leaf_compression = BincodeCompression::new(self.compression);
        let mut nodes = Vec::with_capacity(tree.node_count());
        for node_min in tree.sorted_node_mins() {
            let record = match tree.get_node(node_min) {
                Some(Node::Leaf(leaf)) => NodeRecord::Leaf(leaf_compression.compress(leaf.as_ref())?),
                Some(Node::Tile(tile)) => NodeRecord::Tile(*tile),
                None => continue,
            };
            nodes.push((node_min, record));
        }

        Ok(GridPayload {
            transform: *grid.transform(),
            background: grid.background(),
            nodes,
        })
    }
}

fn meta_with_file_stats<T: GridValue>(grid: &VolumeGrid<T>) -> MetaMap {
    let mut meta = grid.meta().clone();
    let bounds = grid.active_bounding_extent();
    if !bounds.is_empty() {
        meta.insert(META_FILE_BBOX_MIN, bounds.minimum);
        meta.insert(META_FILE_BBOX_MAX, bounds.max());
    }
    meta.insert(META_FILE_VOXEL_COUNT, grid.active_voxel_count() as i64);

    meta
}

/// Writes `grids` into a new archive at `path`, replacing any existing file.
///
/// The archive is staged in a temporary file next to `path` and renamed over it only once complete, so a failed write leaves
/// whatever was at `path` untouched.
pub fn write_grids<T>(path: impl AsRef<Path>, grids: &[&VolumeGrid<T>]) -> Result<(), ArchiveError>
where
    T: GridValue,
{
    check_registered(T::TYPE_NAME)?;

    let path = path.as_ref();
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let staged = tempfile::NamedTempFile::new_in(dir)?;
    let staged = ArchiveWriter::new(BufWriter::new(staged))
        .write_grids(grids)?
        .into_inner()
        .map_err(|e| e.into_error())?;
    staged.persist(path).map_err(|e| e.error)?;

    Ok(())
}

/// Reads grids out of an archive.
pub struct ArchiveReader<R> {
    reader: R,
    entries: Vec<(GridDescriptor, u64)>,
}

impl ArchiveReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        Self::new(BufReader::new(File::open(path)?))
    }
}

impl<R> ArchiveReader<R>
where
    R: Read + Seek,
{
    /// Reads the header and every grid descriptor.
    pub fn new(mut reader: R) -> Result<Self, ArchiveError> {
        if !registry::is_initialized() {
            return Err(ArchiveError::NotInitialized);
        }

        let start = reader.stream_position()?;
        let end = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(start))?;

        let mut magic = [0; 8];
        reader.read_exact(&mut magic)?;
        if magic != ARCHIVE_MAGIC {
            return Err(ArchiveError::BadMagic);
        }
        let header: ArchiveHeader = decode_options(remaining(&mut reader, end)?).deserialize_from(&mut reader)?;
        if header.version != ARCHIVE_VERSION {
            return Err(ArchiveError::UnsupportedVersion(header.version));
        }

        // The count isn't trusted with an allocation; a bogus one runs out of descriptors instead.
        let mut entries = Vec::new();
        for _ in 0..header.grid_count {
            let descriptor: GridDescriptor =
                decode_options(remaining(&mut reader, end)?).deserialize_from(&mut reader)?;
            let payload_offset = reader.stream_position()?;
            let payload_end = payload_offset
                .checked_add(descriptor.payload_len)
                .filter(|payload_end| *payload_end <= end)
                .ok_or_else(|| {
                    ArchiveError::Corrupt(format!(
                        "grid \"{}\" claims {} payload bytes, but only {} remain",
                        descriptor.name,
                        descriptor.payload_len,
                        end.saturating_sub(payload_offset)
                    ))
                })?;
            reader.seek(SeekFrom::Start(payload_end))?;
            entries.push((descriptor, payload_offset));
        }

        Ok(Self { reader, entries })
    }

    /// The descriptor of every grid, in file order.
    pub fn grid_descriptors(&self) -> impl Iterator<Item = &GridDescriptor> {
        self.entries.iter().map(|(d, _)| d)
    }

    pub fn grid_count(&self) -> usize {
        self.entries.len()
    }

    /// Reads the first grid called `name`.
    pub fn read_grid<T>(&mut self, name: &str) -> Result<VolumeGrid<T>, ArchiveError>
    where
        T: GridValue,
    {
        let index = self
            .entries
            .iter()
            .position(|(d, _)| d.name == name)
            .ok_or_else(|| ArchiveError::GridNotFound(name.to_owned()))?;

        self.read_grid_at(index)
    }

    /// Reads every grid, in file order.
    pub fn read_all<T>(&mut self) -> Result<Vec<VolumeGrid<T>>, ArchiveError>
    where
        T: GridValue,
    {
        (0..self.entries.len()).map(|i| self.read_grid_at(i)).collect()
    }

    fn read_grid_at<T>(&mut self, index: usize) -> Result<VolumeGrid<T>, ArchiveError>
    where
        T: GridValue,
    {
        let (descriptor, offset) = &self.entries[index];
        check_registered(&descriptor.value_type)?;
        if descriptor.value_type != T::TYPE_NAME {
            return Err(ArchiveError::WrongValueType {
                expected: T::TYPE_NAME,
                found: descriptor.value_type.clone(),
            });
        }

        // `new` checked that the payload lies within the stream.
        self.reader.seek(SeekFrom::Start(*offset))?;
        let mut payload_bytes = Vec::new();
        (&mut self.reader)
            .take(descriptor.payload_len)
            .read_to_end(&mut payload_bytes)?;
        let payload: GridPayload<T> = decode_options(descriptor.payload_len).deserialize(&payload_bytes)?;

        let mut tree = Tree::new(payload.background);
        for (node_min, record) in payload.nodes.into_iter() {
            match record {
                NodeRecord::Tile(tile) => {
                    if !LEAF_INDEXER.node_min_is_valid(node_min) {
                        return Err(ArchiveError::Corrupt(format!(
                            "tile at {:?} is not aligned to a node",
                            node_min
                        )));
                    }
                    tree.insert_tile(node_min, tile);
                }
                NodeRecord::Leaf(compressed) => {
                    let leaf = compressed.decompress()?;
                    if leaf.origin() != node_min || !leaf.is_well_formed() {
                        return Err(ArchiveError::Corrupt(format!(
                            "leaf stored at {:?} covers {:?} with {} values",
                            node_min,
                            leaf.extent(),
                            leaf.values().values_slice().len()
                        )));
                    }
                    tree.insert_leaf(leaf);
                }
            }
        }

        let mut meta = descriptor.meta.clone();
        for key in [META_FILE_BBOX_MIN, META_FILE_BBOX_MAX, META_FILE_VOXEL_COUNT].iter() {
            meta.remove(key);
        }

        tracing::debug!(
            "Read grid \"{}\" with {} nodes",
            descriptor.name,
            tree.node_count()
        );

        Ok(VolumeGrid::from_parts(tree, payload.transform, meta))
    }
}

fn remaining(reader: &mut impl Seek, end: u64) -> Result<u64, ArchiveError> {
    Ok(end.saturating_sub(reader.stream_position()?))
}

/// Reads every grid of the archive at `path`.
pub fn read_grids<T>(path: impl AsRef<Path>) -> Result<Vec<VolumeGrid<T>>, ArchiveError>
where
    T: GridValue,
{
    ArchiveReader::open(path)?.read_all()
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Array3, Bitset512, BytesCompression, FloatGrid, GridClass, MetaValue};

    use pretty_assertions::assert_eq;
    use std::fs;
    use std::io::Cursor;

    fn sample_grid(name: &str) -> FloatGrid {
        let mut grid = FloatGrid::new(1.0);
        grid.set_name(name);
        grid.set_grid_class(GridClass::FogVolume);
        grid.set_transform(Transform::uniform_scale(0.5));
        grid.meta_mut().insert("shape", PointN([20, 20, 20]));
        for p in Extent3i::from_min_and_shape(PointN([-3, 0, 5]), PointN([10, 4, 9])).iter_points() {
            grid.tree_mut().set_value_on(p, (p.x() + p.y() - p.z()) as f32);
        }
        grid.tree_mut().insert_tile(PointN([32, 32, 32]), Tile::new(-1.0, false));

        grid
    }

    fn write_to_memory(grids: &[&FloatGrid]) -> Vec<u8> {
        registry::initialize();
        ArchiveWriter::new(Vec::new()).write_grids(grids).unwrap()
    }

    #[test]
    fn write_and_read_back_multiple_grids() {
        let a = sample_grid("a");
        let b = sample_grid("b");
        let bytes = write_to_memory(&[&a, &b]);

        let mut reader = ArchiveReader::new(Cursor::new(bytes)).unwrap();
        let names: Vec<_> = reader.grid_descriptors().map(|d| d.name.clone()).collect();
        assert_eq!(names, vec!["a".to_owned(), "b".to_owned()]);

        assert_eq!(reader.read_grid::<f32>("b").unwrap(), b);
        assert_eq!(reader.read_all::<f32>().unwrap(), vec![a, b]);
    }

    #[test]
    fn descriptors_carry_file_stats() {
        let grid = sample_grid("stats");
        let reader = ArchiveReader::new(Cursor::new(write_to_memory(&[&grid]))).unwrap();
        let descriptor = reader.grid_descriptors().next().unwrap();

        assert_eq!(
            descriptor.meta.get(META_FILE_BBOX_MIN),
            Some(&MetaValue::Vec3i(PointN([-3, 0, 5])))
        );
        assert_eq!(
            descriptor.meta.get(META_FILE_BBOX_MAX),
            Some(&MetaValue::Vec3i(PointN([6, 3, 13])))
        );
        assert_eq!(
            descriptor.meta.get(META_FILE_VOXEL_COUNT),
            Some(&MetaValue::Int64(360))
        );
        // Writing doesn't touch the grid itself.
        assert!(!grid.meta().contains_key(META_FILE_VOXEL_COUNT));
    }

    #[test]
    fn rejects_foreign_bytes_and_wrong_types() {
        registry::initialize();
        assert!(matches!(
            ArchiveReader::new(Cursor::new(b"not an archive".to_vec())),
            Err(ArchiveError::BadMagic)
        ));

        let mut reader = ArchiveReader::new(Cursor::new(write_to_memory(&[&sample_grid("f")]))).unwrap();
        assert!(matches!(
            reader.read_grid::<f64>("f"),
            Err(ArchiveError::WrongValueType { expected: "double", .. })
        ));
        assert!(matches!(
            reader.read_grid::<f32>("g"),
            Err(ArchiveError::GridNotFound(_))
        ));
    }

    #[test]
    fn unsupported_version_is_reported() {
        let mut bytes = ARCHIVE_MAGIC.to_vec();
        bincode::serialize_into(
            &mut bytes,
            &ArchiveHeader {
                version: 99,
                grid_count: 0,
            },
        )
        .unwrap();
        registry::initialize();

        assert!(matches!(
            ArchiveReader::new(Cursor::new(bytes)),
            Err(ArchiveError::UnsupportedVersion(99))
        ));
    }

    /// Same layout as `LeafNode`, but free to hold any extent.
    #[derive(Serialize)]
    struct RawLeaf {
        values: Array3<f32>,
        active: Bitset512,
    }

    fn compressed_leaf(values: Array3<f32>) -> NodeRecord<f32> {
        let raw = RawLeaf {
            values,
            active: Bitset512::all_set(),
        };
        let mut bytes = Vec::new();
        Lz4::default()
            .compress_bytes(&bincode::serialize(&raw).unwrap(), &mut bytes)
            .unwrap();

        NodeRecord::Leaf(Compressed::new(bytes))
    }

    /// An archive holding one grid with `nodes`, claiming `payload_len` bytes for it when given.
    fn hand_written_archive(nodes: Vec<(Point3i, NodeRecord<f32>)>, payload_len: Option<u64>) -> Vec<u8> {
        registry::initialize();
        let payload = bincode::serialize(&GridPayload {
            transform: Transform::linear(),
            background: 0.0f32,
            nodes,
        })
        .unwrap();
        let descriptor = GridDescriptor {
            value_type: "float".to_owned(),
            name: "hand".to_owned(),
            meta: MetaMap::new(),
            payload_len: payload_len.unwrap_or(payload.len() as u64),
        };

        let mut bytes = ARCHIVE_MAGIC.to_vec();
        bincode::serialize_into(
            &mut bytes,
            &ArchiveHeader {
                version: ARCHIVE_VERSION,
                grid_count: 1,
            },
        )
        .unwrap();
        bincode::serialize_into(&mut bytes, &descriptor).unwrap();
        bytes.extend_from_slice(&payload);

        bytes
    }

    fn read_hand_written(bytes: Vec<u8>) -> Result<FloatGrid, ArchiveError> {
        ArchiveReader::new(Cursor::new(bytes))?.read_grid("hand")
    }

    #[test]
    fn hand_written_archive_is_readable() {
        let extent = LEAF_INDEXER.extent_for_node_with_min(PointN([8, 0, -8]));
        let grid = read_hand_written(hand_written_archive(
            vec![
                (extent.minimum, compressed_leaf(Array3::fill(extent, 2.0))),
                (Point3i::ZERO, NodeRecord::Tile(Tile::new(1.0, false))),
            ],
            None,
        ))
        .unwrap();

        assert_eq!(grid.tree().leaf_count(), 1);
        assert_eq!(grid.tree().get(PointN([9, 1, -1])), 2.0);
        assert_eq!(grid.tree().get(PointN([1, 1, 1])), 1.0);
    }

    #[test]
    fn huge_grid_count_is_an_error() {
        registry::initialize();
        let mut bytes = ARCHIVE_MAGIC.to_vec();
        bincode::serialize_into(
            &mut bytes,
            &ArchiveHeader {
                version: ARCHIVE_VERSION,
                grid_count: u32::MAX,
            },
        )
        .unwrap();

        assert!(matches!(
            ArchiveReader::new(Cursor::new(bytes)),
            Err(ArchiveError::Codec(_))
        ));
    }

    #[test]
    fn oversized_payload_len_is_corrupt() {
        let bytes = hand_written_archive(Vec::new(), Some(1 << 40));

        assert!(matches!(read_hand_written(bytes), Err(ArchiveError::Corrupt(_))));
    }

    #[test]
    fn truncated_payload_is_corrupt() {
        let mut bytes = write_to_memory(&[&sample_grid("t")]);
        bytes.truncate(bytes.len() - 10);

        assert!(matches!(
            ArchiveReader::new(Cursor::new(bytes)),
            Err(ArchiveError::Corrupt(_))
        ));
    }

    #[test]
    fn truncated_descriptor_is_an_error() {
        let bytes = write_to_memory(&[&sample_grid("t")]);
        let header_end = ARCHIVE_MAGIC.len() + 8;

        assert!(ArchiveReader::new(Cursor::new(bytes[..header_end + 5].to_vec())).is_err());
    }

    #[test]
    fn leaf_must_sit_at_its_node_min() {
        let extent = LEAF_INDEXER.extent_for_node_with_min(Point3i::ZERO);
        let bytes = hand_written_archive(
            vec![(PointN([8, 0, 0]), compressed_leaf(Array3::fill(extent, 2.0)))],
            None,
        );

        assert!(matches!(read_hand_written(bytes), Err(ArchiveError::Corrupt(_))));
    }

    #[test]
    fn leaf_must_cover_a_whole_node() {
        let extent = Extent3i::from_min_and_shape(Point3i::ZERO, PointN([4, 8, 8]));
        let bytes = hand_written_archive(vec![(Point3i::ZERO, compressed_leaf(Array3::fill(extent, 2.0)))], None);

        assert!(matches!(read_hand_written(bytes), Err(ArchiveError::Corrupt(_))));
    }

    #[test]
    fn tiles_must_be_node_aligned() {
        let bytes = hand_written_archive(vec![(PointN([3, 0, 0]), NodeRecord::Tile(Tile::new(1.0, true)))], None);

        assert!(matches!(read_hand_written(bytes), Err(ArchiveError::Corrupt(_))));
    }

    /// Accepts `budget` bytes, then fails every write.
    struct FailingWriter {
        budget: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.budget == 0 {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
            }
            let n = buf.len().min(self.budget);
            self.budget -= n;

            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_reported() {
        registry::initialize();
        let grid = sample_grid("w");
        let result = ArchiveWriter::new(FailingWriter { budget: 64 }).write_grids(&[&grid]);

        // Depending on where the budget runs out, the I/O error surfaces directly or through bincode.
        assert!(matches!(result, Err(ArchiveError::Io(_)) | Err(ArchiveError::Codec(_))));
    }

    fn dir_entry_count(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn write_grids_replaces_existing_file() {
        registry::initialize();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grids.vdb");
        fs::write(&path, b"previous contents").unwrap();

        let grid = sample_grid("replaced");
        write_grids(&path, &[&grid]).unwrap();

        assert_eq!(read_grids::<f32>(&path).unwrap(), vec![grid]);
        // No staging file is left behind.
        assert_eq!(dir_entry_count(dir.path()), 1);
    }

    #[test]
    fn failed_write_leaves_destination_alone() {
        registry::initialize();
        let dir = tempfile::tempdir().unwrap();
        // A file can't be renamed over a directory, so the write fails after the archive is staged.
        let path = dir.path().join("taken");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"keep me").unwrap();

        let result = write_grids(&path, &[&sample_grid("x")]);

        assert!(matches!(result, Err(ArchiveError::Io(_))));
        assert_eq!(fs::read(path.join("keep")).unwrap(), b"keep me".to_vec());
        assert_eq!(dir_entry_count(dir.path()), 1);
    }
}
