//! OBJ file loader for 3D models

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Range;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::render::mesh::{Mesh, Vertex};

/// Errors raised while reading a Wavefront OBJ file
#[derive(Error, Debug)]
pub enum ObjError {
    /// The file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A statement could not be parsed
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },
    /// The file parsed but describes no usable geometry
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Consecutive faces drawn with one material
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialGroup {
    /// Name from the `usemtl` statement that opened the group
    pub material_name: Option<String>,

    /// Slice of the mesh's index buffer covered by the group
    pub indices: Range<usize>,
}

/// Geometry plus the material references found in the file
#[derive(Debug, Clone, Default)]
pub struct ObjModel {
    /// Triangulated geometry
    pub mesh: Mesh,

    /// `mtllib` file, resolved against the OBJ's directory when loaded from disk
    pub material_library: Option<PathBuf>,

    /// Material groups in file order, covering every index exactly once
    pub groups: Vec<MaterialGroup>,
}

/// Wavefront OBJ reader
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<ObjModel, ObjError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut model = Self::parse(BufReader::new(file))?;

        if let (Some(library), Some(dir)) = (model.material_library.as_mut(), path.parent()) {
            *library = dir.join(&*library);
        }

        log::info!(
            "Loaded OBJ {:?}: {} vertices, {} triangles",
            path,
            model.mesh.vertices.len(),
            model.mesh.triangle_count()
        );
        Ok(model)
    }

    /// Parse OBJ text
    ///
    /// Faces with more than three corners are fan-triangulated. Negative
    /// indices count back from the most recent element. Missing texture
    /// coordinates become `(0, 0)` and missing normals `+Y`. Bytes that are
    /// not UTF-8 (Latin-1 names from older exporters) are decoded lossily.
    pub fn parse<R: BufRead>(mut reader: R) -> Result<ObjModel, ObjError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut tex_coords: Vec<[f32; 2]> = Vec::new();
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        let mut material_library = None;
        let mut groups = Vec::new();
        let mut current_material: Option<String> = None;
        let mut group_start = 0;

        let mut buffer = Vec::new();
        let mut line_number = 0;

        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            line_number += 1;

            let line = String::from_utf8_lossy(&buffer);
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let parse_error = |message: &str| ObjError::ParseError {
                line: line_number,
                message: message.to_string(),
            };

            match parts[0] {
                "v" if parts.len() >= 4 => {
                    positions.push(parse_floats::<3>(&parts[1..]).ok_or_else(|| parse_error("invalid vertex"))?);
                }
                "vn" if parts.len() >= 4 => {
                    normals.push(parse_floats::<3>(&parts[1..]).ok_or_else(|| parse_error("invalid normal"))?);
                }
                "vt" if parts.len() >= 2 => {
                    tex_coords.push(parse_tex_coord(&parts[1..]).ok_or_else(|| parse_error("invalid tex coord"))?);
                }
                "f" if parts.len() >= 4 => {
                    let mut face_indices = Vec::with_capacity(parts.len() - 1);

                    for corner in &parts[1..] {
                        let mut fields = corner.split('/');

                        let position = fields
                            .next()
                            .and_then(|field| resolve_index(field, positions.len()))
                            .and_then(|index| positions.get(index))
                            .ok_or_else(|| parse_error("position index out of bounds"))?;

                        let tex_coord = fields
                            .next()
                            .and_then(|field| resolve_index(field, tex_coords.len()))
                            .and_then(|index| tex_coords.get(index))
                            .unwrap_or(&[0.0, 0.0]);

                        let normal = fields
                            .next()
                            .and_then(|field| resolve_index(field, normals.len()))
                            .and_then(|index| normals.get(index))
                            .unwrap_or(&[0.0, 1.0, 0.0]);

                        vertices.push(Vertex::new(*position, *normal, *tex_coord));
                        let index = u32::try_from(vertices.len() - 1)
                            .map_err(|_| ObjError::InvalidFormat("too many vertices".to_string()))?;
                        face_indices.push(index);
                    }

                    // Fan triangulation
                    for i in 1..(face_indices.len() - 1) {
                        indices.extend_from_slice(&[face_indices[0], face_indices[i], face_indices[i + 1]]);
                    }
                }
                "mtllib" if parts.len() >= 2 => {
                    material_library = Some(PathBuf::from(parts[1..].join(" ")));
                }
                "usemtl" if parts.len() >= 2 => {
                    close_group(&mut groups, current_material.take(), group_start..indices.len());
                    group_start = indices.len();
                    current_material = Some(parts[1].to_string());
                }
                _ => {}
            }
        }

        if vertices.is_empty() {
            return Err(ObjError::InvalidFormat("No vertices found in OBJ file".to_string()));
        }
        close_group(&mut groups, current_material, group_start..indices.len());

        Ok(ObjModel {
            mesh: Mesh::new(vertices, indices),
            material_library,
            groups,
        })
    }
}

/// Record a finished group; groups without faces are dropped
fn close_group(groups: &mut Vec<MaterialGroup>, material_name: Option<String>, indices: Range<usize>) {
    if !indices.is_empty() {
        groups.push(MaterialGroup { material_name, indices });
    }
}

fn parse_floats<const N: usize>(fields: &[&str]) -> Option<[f32; N]> {
    let mut values = [0.0; N];
    for (value, field) in values.iter_mut().zip(fields) {
        *value = field.parse().ok()?;
    }
    Some(values)
}

/// `u [v [w]]`, with `v` defaulting to 0
fn parse_tex_coord(fields: &[&str]) -> Option<[f32; 2]> {
    let u = fields.first()?.parse().ok()?;
    let v = match fields.get(1) {
        Some(field) => field.parse().ok()?,
        None => 0.0,
    };
    Some([u, v])
}

/// Convert a 1-based (or negative, relative) OBJ index to 0-based
fn resolve_index(field: &str, count: usize) -> Option<usize> {
    if field.is_empty() {
        return None;
    }
    let index: isize = field.parse().ok()?;
    if index > 0 {
        Some(index.unsigned_abs() - 1)
    } else if index < 0 {
        count.checked_sub(index.unsigned_abs())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const QUAD: &str = "\
mtllib gallery.mtl
v -1.0 0.0 -1.0
v 1.0 0.0 -1.0
v 1.0 0.0 1.0
v -1.0 0.0 1.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 1.0 0.0
usemtl Floor
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn test_quad_is_fan_triangulated() {
        let model = ObjLoader::parse(Cursor::new(QUAD)).unwrap();
        assert_eq!(model.mesh.vertices.len(), 4);
        assert_eq!(model.mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(model.mesh.indices_in_bounds());
        assert_eq!(model.mesh.vertices[2].tex_coord, [1.0, 1.0]);
    }

    #[test]
    fn test_material_references_are_recorded() {
        let model = ObjLoader::parse(Cursor::new(QUAD)).unwrap();
        assert_eq!(model.material_library, Some(PathBuf::from("gallery.mtl")));
        assert_eq!(
            model.groups,
            vec![MaterialGroup {
                material_name: Some("Floor".to_string()),
                indices: 0..6,
            }]
        );
    }

    #[test]
    fn test_each_usemtl_opens_a_group() {
        let source = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
f 1 2 3
usemtl Wall
f 1 2 3
usemtl Unused
usemtl Painting
f 2 4 3
f 1 2 4
";
        let model = ObjLoader::parse(Cursor::new(source)).unwrap();
        let groups: Vec<_> = model
            .groups
            .iter()
            .map(|group| (group.material_name.as_deref(), group.indices.clone()))
            .collect();

        assert_eq!(groups, vec![(None, 0..3), (Some("Wall"), 3..6), (Some("Painting"), 6..12)]);
        assert_eq!(model.mesh.triangle_count(), 4);
    }

    #[test]
    fn test_single_component_tex_coords_default_v_to_zero() {
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0.25\nvt 0.5\nvt 0.75 1.0\nf 1/1 2/2 3/3\n";
        let model = ObjLoader::parse(Cursor::new(source)).unwrap();
        let tex_coords: Vec<_> = model.mesh.vertices.iter().map(|vertex| vertex.tex_coord).collect();

        assert_eq!(tex_coords, vec![[0.25, 0.0], [0.5, 0.0], [0.75, 1.0]]);
    }

    #[test]
    fn test_latin1_bytes_do_not_fail_the_load() {
        let source: &[u8] = b"# Galer\xEDa\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl Pintura\xF1\nf 1 2 3\n";
        let model = ObjLoader::parse(Cursor::new(source)).unwrap();

        assert_eq!(model.mesh.triangle_count(), 1);
        let name = model.groups[0].material_name.as_deref().unwrap();
        assert!(name.starts_with("Pintura"));
    }

    #[test]
    fn test_negative_indices_and_missing_attributes() {
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let model = ObjLoader::parse(Cursor::new(source)).unwrap();

        assert_eq!(model.mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(model.mesh.vertices[0].normal, [0.0, 1.0, 0.0]);
        assert_eq!(model.mesh.vertices[0].tex_coord, [0.0, 0.0]);
    }

    #[test]
    fn test_position_only_with_normals() {
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
        let model = ObjLoader::parse(Cursor::new(source)).unwrap();
        assert_eq!(model.mesh.vertices[2].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_out_of_bounds_face_is_an_error() {
        let source = "v 0 0 0\nv 1 0 0\nf 1 2 3\n";
        let error = ObjLoader::parse(Cursor::new(source)).unwrap_err();
        assert!(matches!(error, ObjError::ParseError { line: 3, .. }));
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let error = ObjLoader::parse(Cursor::new("v 0 zero 0\n")).unwrap_err();
        assert!(matches!(error, ObjError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_empty_file_is_invalid() {
        let error = ObjLoader::parse(Cursor::new("# nothing\n")).unwrap_err();
        assert!(matches!(error, ObjError::InvalidFormat(_)));
    }
}
