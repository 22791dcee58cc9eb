use crate::TriQuadMesh;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const HEADER_SIZE: usize = 80;

/// Saves `mesh` as a binary STL file at `path`. Quads are split into two triangles.
pub fn write_stl(mesh: &TriQuadMesh, path: impl AsRef<Path>) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_stl_to(mesh, &mut writer)?;
    writer.flush()
}

/// Writes `mesh` in the binary STL format.
pub fn write_stl_to(mesh: &TriQuadMesh, mut writer: impl Write) -> std::io::Result<()> {
    let mut header = [b' '; HEADER_SIZE];
    let text = b"binary STL written by imvdb";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    let triangles = mesh.triangulate();
    writer.write_all(&(triangles.len() as u32).to_le_bytes())?;

    for [i0, i1, i2] in triangles.into_iter() {
        let v0 = mesh.points[i0 as usize];
        let v1 = mesh.points[i1 as usize];
        let v2 = mesh.points[i2 as usize];

        write_vector(&mut writer, unit_normal(v0, v1, v2))?;
        write_vector(&mut writer, v0)?;
        write_vector(&mut writer, v1)?;
        write_vector(&mut writer, v2)?;

        // Attribute byte count.
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

fn write_vector(writer: &mut impl Write, v: [f32; 3]) -> std::io::Result<()> {
    for c in v.iter() {
        writer.write_all(&c.to_le_bytes())?;
    }

    Ok(())
}

fn unit_normal(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> [f32; 3] {
    let u = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
    let v = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > f32::EPSILON {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0; 3]
    }
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

    #[test]
    fn binary_layout() {
        let mesh = TriQuadMesh {
            points: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            triangles: vec![[0, 1, 2]],
            quads: vec![[0, 1, 2, 3]],
        };
        let mut bytes = Vec::new();
        write_stl_to(&mesh, &mut bytes).unwrap();

        assert_eq!(bytes.len(), HEADER_SIZE + 4 + 3 * 50);
        assert_eq!(&bytes[HEADER_SIZE..HEADER_SIZE + 4], &3u32.to_le_bytes());

        // First triangle's normal is +Z.
        let nz = f32::from_le_bytes([bytes[92], bytes[93], bytes[94], bytes[95]]);
        assert_eq!(nz, 1.0);
    }
}
