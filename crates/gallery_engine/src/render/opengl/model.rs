//! Indexed mesh drawn one material group at a time

use std::collections::HashMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

use gl::types::{GLsizei, GLsizeiptr, GLuint};

use crate::assets::{AssetError, ImageData, MtlData, MtlParser, ObjLoader, ObjModel};
use crate::render::backend::Drawable;
use crate::render::material::Material;
use crate::render::mesh::{Mesh, Vertex};
use crate::render::opengl::texture::GlTexture;
use crate::render::shader::ShaderProgram;

/// Sampler uniform the lit program reads the diffuse map from
pub const DIFFUSE_SAMPLER_UNIFORM: &str = "texture_diffuse1";

/// Index range drawn with one diffuse texture and one material
#[derive(Debug, Clone, PartialEq)]
struct ModelPart {
    indices: Range<usize>,
    texture: usize,
    material: Option<Material>,
}

/// Texture sources and parts worked out before any GL upload
///
/// `None` texture slots are plain white.
#[derive(Debug, Default, PartialEq)]
struct PartPlan {
    textures: Vec<Option<PathBuf>>,
    parts: Vec<ModelPart>,
}

/// Model uploaded to a vertex array, one draw call per material group
#[derive(Debug)]
pub struct GlModel {
    vao: GLuint,
    vbo: GLuint,
    ebo: GLuint,
    textures: Vec<GlTexture>,
    parts: Vec<ModelPart>,
    upload_materials: bool,
}

impl GlModel {
    /// Load an OBJ file with the textures and materials of its `usemtl` groups
    ///
    /// `diffuse_override` replaces every group's `map_Kd`. A texture that fails
    /// to load is replaced by plain white so the geometry still renders. With
    /// `upload_materials` set, each group writes its MTL colors before drawing.
    pub fn load(
        path: impl AsRef<Path>,
        diffuse_override: Option<&Path>,
        upload_materials: bool,
    ) -> Result<Self, AssetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }

        let model = ObjLoader::load_obj(path)?;
        let library = model.material_library.as_deref();
        let materials = library.map(read_material_library).unwrap_or_default();
        let library_dir = library.and_then(Path::parent).unwrap_or_else(|| Path::new(""));

        let plan = plan_parts(&model, &materials, library_dir, diffuse_override);
        let textures = plan
            .textures
            .iter()
            .map(|source| GlTexture::from_image(&diffuse_image(source.as_deref())))
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "Model {:?}: {} material groups, {} textures",
            path,
            plan.parts.len(),
            textures.len()
        );

        Self::upload(&model.mesh, textures, plan.parts, upload_materials)
    }

    fn upload(
        mesh: &Mesh,
        textures: Vec<GlTexture>,
        parts: Vec<ModelPart>,
        upload_materials: bool,
    ) -> Result<Self, AssetError> {
        if !mesh.indices_in_bounds() {
            return Err(AssetError::InvalidData("mesh index out of bounds".to_string()));
        }
        // Every part range is then small enough for a GLsizei count.
        GLsizei::try_from(mesh.indices.len())
            .map_err(|_| AssetError::InvalidData("too many indices".to_string()))?;
        if parts.iter().any(|part| part.indices.end > mesh.indices.len() || part.texture >= textures.len()) {
            return Err(AssetError::InvalidData("material group outside the mesh".to_string()));
        }

        let vertex_bytes: &[u8] = bytemuck::cast_slice(&mesh.vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(&mesh.indices);

        let (mut vao, mut vbo, mut ebo) = (0, 0, 0);
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);
            gl::GenBuffers(1, &mut ebo);

            gl::BindVertexArray(vao);

            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                vertex_bytes.len() as GLsizeiptr,
                vertex_bytes.as_ptr().cast(),
                gl::STATIC_DRAW,
            );

            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                index_bytes.len() as GLsizeiptr,
                index_bytes.as_ptr().cast(),
                gl::STATIC_DRAW,
            );

            for attribute in Vertex::ATTRIBUTES {
                gl::EnableVertexAttribArray(attribute.location);
                gl::VertexAttribPointer(
                    attribute.location,
                    attribute.components,
                    gl::FLOAT,
                    gl::FALSE,
                    Vertex::STRIDE as GLsizei,
                    attribute.offset as *const _,
                );
            }

            gl::BindVertexArray(0);
        }

        log::info!(
            "Uploaded model: {} vertices, {} triangles",
            mesh.vertices.len(),
            mesh.triangle_count()
        );

        Ok(Self {
            vao,
            vbo,
            ebo,
            textures,
            parts,
            upload_materials,
        })
    }
}

impl Drawable for GlModel {
    fn draw(&mut self, shader: &mut dyn ShaderProgram) {
        let textures = &self.textures;

        unsafe { gl::BindVertexArray(self.vao) };
        draw_parts(&self.parts, shader, self.upload_materials, |part| {
            if let Some(texture) = textures.get(part.texture) {
                texture.bind(0);
            }
            let offset = part.indices.start * std::mem::size_of::<u32>();
            unsafe {
                gl::DrawElements(
                    gl::TRIANGLES,
                    part.indices.len() as GLsizei,
                    gl::UNSIGNED_INT,
                    offset as *const _,
                );
            }
        });
        unsafe {
            gl::BindVertexArray(0);
            gl::ActiveTexture(gl::TEXTURE0);
        }
    }
}

impl Drop for GlModel {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteBuffers(1, &self.ebo);
        }
    }
}

/// Issue one draw per part, writing the part's material first when enabled
fn draw_parts(
    parts: &[ModelPart],
    shader: &mut dyn ShaderProgram,
    upload_materials: bool,
    mut draw_range: impl FnMut(&ModelPart),
) {
    shader.set_int(DIFFUSE_SAMPLER_UNIFORM, 0);
    for part in parts {
        if upload_materials {
            if let Some(material) = &part.material {
                material.upload(shader);
            }
        }
        draw_range(part);
    }
}

/// Match each material group to a texture slot and an MTL material
///
/// Groups without a `usemtl` borrow the first textured material, so files
/// with a single unnamed material still get their map. Identical texture
/// sources share one slot.
fn plan_parts(
    model: &ObjModel,
    materials: &HashMap<String, MtlData>,
    library_dir: &Path,
    diffuse_override: Option<&Path>,
) -> PartPlan {
    let mut names: Vec<&String> = materials.keys().collect();
    names.sort();
    let unnamed = names
        .into_iter()
        .filter_map(|name| materials.get(name))
        .find(|material| material.diffuse_map.is_some());

    let mut plan = PartPlan::default();
    for group in &model.groups {
        let mtl = match &group.material_name {
            Some(name) => {
                let found = materials.get(name);
                if found.is_none() {
                    log::debug!("Material {} is not in the library, drawing it untextured", name);
                }
                found
            }
            None => unnamed,
        };

        let source = diffuse_override
            .map(Path::to_path_buf)
            .or_else(|| mtl.and_then(|mtl| mtl.diffuse_map.as_ref()).map(|map| library_dir.join(map)));
        let texture = match plan.textures.iter().position(|existing| *existing == source) {
            Some(slot) => slot,
            None => {
                plan.textures.push(source);
                plan.textures.len() - 1
            }
        };

        plan.parts.push(ModelPart {
            indices: group.indices.clone(),
            texture,
            material: mtl.map(MtlData::to_material),
        });
    }
    plan
}

fn read_material_library(library: &Path) -> HashMap<String, MtlData> {
    let bytes = match std::fs::read(library) {
        Ok(bytes) => bytes,
        Err(error) => {
            log::warn!("Material library {:?} unreadable: {}", library, error);
            return HashMap::new();
        }
    };

    match MtlParser::parse(&String::from_utf8_lossy(&bytes)) {
        Ok(materials) => materials,
        Err(error) => {
            log::warn!("Material library {:?} is malformed: {}", library, error);
            HashMap::new()
        }
    }
}

fn diffuse_image(source: Option<&Path>) -> ImageData {
    let white = || ImageData::solid_color(1, 1, [255; 4]);
    match source {
        Some(path) => ImageData::from_file(path).unwrap_or_else(|error| {
            log::warn!("Diffuse texture {:?} unavailable ({}), using white", path, error);
            white()
        }),
        None => white(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MaterialGroup;
    use crate::render::testing::{Call, CallLog, RecordingShader, UniformValue};

    const GALLERY_MTL: &str = "\
newmtl Wall
Kd 0.9 0.9 0.85
map_Kd textures/wall.png

newmtl Painting
Kd 0.4 0.2 0.1
map_Kd textures/painting.png

newmtl Frame
Kd 0.3 0.2 0.1
";

    fn group(name: Option<&str>, indices: Range<usize>) -> MaterialGroup {
        MaterialGroup {
            material_name: name.map(str::to_string),
            indices,
        }
    }

    fn model_with(groups: Vec<MaterialGroup>) -> ObjModel {
        ObjModel {
            groups,
            ..ObjModel::default()
        }
    }

    #[test]
    fn test_each_group_gets_its_own_texture_and_material() {
        let materials = MtlParser::parse(GALLERY_MTL).unwrap();
        let model = model_with(vec![group(Some("Wall"), 0..6), group(Some("Painting"), 6..9)]);

        let plan = plan_parts(&model, &materials, Path::new("scene"), None);

        assert_eq!(
            plan.textures,
            vec![
                Some(PathBuf::from("scene/textures/wall.png")),
                Some(PathBuf::from("scene/textures/painting.png")),
            ]
        );
        assert_eq!(plan.parts[0].indices, 0..6);
        assert_eq!(plan.parts[1].texture, 1);
        assert_eq!(plan.parts[1].material, Some(materials["Painting"].to_material()));
    }

    #[test]
    fn test_override_texture_is_shared_by_all_groups() {
        let materials = MtlParser::parse(GALLERY_MTL).unwrap();
        let model = model_with(vec![group(Some("Wall"), 0..3), group(Some("Painting"), 3..6)]);

        let plan = plan_parts(&model, &materials, Path::new("scene"), Some(Path::new("atlas.png")));

        assert_eq!(plan.textures, vec![Some(PathBuf::from("atlas.png"))]);
        assert!(plan.parts.iter().all(|part| part.texture == 0));
    }

    #[test]
    fn test_untextured_and_unknown_materials_share_white() {
        let materials = MtlParser::parse(GALLERY_MTL).unwrap();
        let model = model_with(vec![group(Some("Frame"), 0..3), group(Some("Missing"), 3..6)]);

        let plan = plan_parts(&model, &materials, Path::new(""), None);

        assert_eq!(plan.textures, vec![None]);
        assert!(plan.parts[0].material.is_some());
        assert_eq!(plan.parts[1].material, None);
    }

    #[test]
    fn test_unnamed_group_borrows_first_textured_material() {
        let materials = MtlParser::parse(GALLERY_MTL).unwrap();
        let plan = plan_parts(&model_with(vec![group(None, 0..3)]), &materials, Path::new(""), None);

        assert_eq!(plan.textures, vec![Some(PathBuf::from("textures/painting.png"))]);
    }

    #[test]
    fn test_library_is_read_from_disk() {
        let dir = std::env::temp_dir().join(format!("gallery_engine_mtl_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let library = dir.join("gallery.mtl");
        std::fs::write(&library, b"newmtl Pared\xED\nmap_Kd walls.png\n").unwrap();

        let materials = read_material_library(&library);
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(materials.len(), 1);
        assert!(materials.values().all(|material| material.diffuse_map.as_deref() == Some("walls.png")));
    }

    #[test]
    fn test_missing_library_has_no_materials() {
        assert!(read_material_library(Path::new("missing/gallery.mtl")).is_empty());
    }

    #[test]
    fn test_one_draw_per_part_in_order() {
        let log = CallLog::default();
        let mut shader = RecordingShader::new("lit", &log);
        let materials = MtlParser::parse(GALLERY_MTL).unwrap();
        let model = model_with(vec![group(Some("Wall"), 0..6), group(Some("Painting"), 6..9)]);
        let plan = plan_parts(&model, &materials, Path::new(""), None);

        draw_parts(&plan.parts, &mut shader, false, |part| {
            log.push(Call::DrawRange {
                indices: part.indices.clone(),
                texture: part.texture,
            });
        });

        let draws: Vec<_> = log
            .calls()
            .into_iter()
            .filter(|call| matches!(call, Call::DrawRange { .. }))
            .collect();
        assert_eq!(
            draws,
            vec![
                Call::DrawRange { indices: 0..6, texture: 0 },
                Call::DrawRange { indices: 6..9, texture: 1 },
            ]
        );
        assert_eq!(log.uniform("lit", DIFFUSE_SAMPLER_UNIFORM), Some(UniformValue::Int(0)));
        assert_eq!(log.uniform("lit", "MaterialDiffuseColor"), None);
    }

    #[test]
    fn test_part_materials_precede_their_draw_when_enabled() {
        let log = CallLog::default();
        let mut shader = RecordingShader::new("lit", &log);
        let materials = MtlParser::parse(GALLERY_MTL).unwrap();
        let model = model_with(vec![group(Some("Wall"), 0..3), group(Some("Painting"), 3..6)]);
        let plan = plan_parts(&model, &materials, Path::new(""), None);

        draw_parts(&plan.parts, &mut shader, true, |part| {
            log.push(Call::DrawRange {
                indices: part.indices.clone(),
                texture: part.texture,
            });
        });

        let painting_color = log
            .position(|call| {
                matches!(call, Call::Uniform("lit", name, UniformValue::Vec4(color))
                    if name == "MaterialDiffuseColor" && (color.x - 0.4).abs() < 1e-6)
            })
            .unwrap();
        let painting_draw = log
            .position(|call| matches!(call, Call::DrawRange { texture: 1, .. }))
            .unwrap();
        let wall_draw = log
            .position(|call| matches!(call, Call::DrawRange { texture: 0, .. }))
            .unwrap();

        assert!(wall_draw < painting_color && painting_color < painting_draw);
    }
}
