//! MTL (Material Template Library) file parser
//!
//! Only the Phong colors, dissolve and the diffuse map are read; every other
//! statement is skipped.

use std::collections::HashMap;

use crate::foundation::math::Vec3;
use crate::render::material::Material;

/// Parsed MTL material data
#[derive(Debug, Clone, PartialEq)]
pub struct MtlData {
    /// Material name
    pub name: String,
    /// Ambient color (Ka)
    pub ambient: Vec3,
    /// Diffuse color (Kd)
    pub diffuse: Vec3,
    /// Specular color (Ks)
    pub specular: Vec3,
    /// Dissolve/opacity (d)
    pub dissolve: f32,
    /// Diffuse texture map (map_Kd), relative to the MTL file
    pub diffuse_map: Option<String>,
}

impl Default for MtlData {
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient: Vec3::new(1.0, 1.0, 1.0),
            diffuse: Vec3::new(0.8, 0.8, 0.8),
            specular: Vec3::new(0.5, 0.5, 0.5),
            dissolve: 1.0,
            diffuse_map: None,
        }
    }
}

impl MtlData {
    /// Convert to the viewer's material
    pub fn to_material(&self) -> Material {
        Material::new()
            .with_ambient(self.ambient.push(1.0))
            .with_diffuse(self.diffuse.push(1.0))
            .with_specular(self.specular.push(1.0))
            .with_transparency(self.dissolve)
    }
}

/// MTL file parser
pub struct MtlParser;

impl MtlParser {
    /// Parse MTL file contents into a map of material name -> MtlData
    pub fn parse(contents: &str) -> Result<HashMap<String, MtlData>, String> {
        let mut materials = HashMap::new();
        let mut current: Option<MtlData> = None;

        for (line_num, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let Some(command) = tokens.next() else {
                continue;
            };

            if command == "newmtl" {
                if let Some(mat) = current.take() {
                    materials.insert(mat.name.clone(), mat);
                }
                let name = tokens
                    .next()
                    .ok_or_else(|| format!("Line {}: newmtl missing material name", line_num + 1))?;
                current = Some(MtlData {
                    name: name.to_string(),
                    ..Default::default()
                });
                continue;
            }

            let Some(mat) = current.as_mut() else {
                continue;
            };

            match command {
                "Ka" => mat.ambient = Self::parse_vec3(&mut tokens, line_num, "Ka")?,
                "Kd" => mat.diffuse = Self::parse_vec3(&mut tokens, line_num, "Kd")?,
                "Ks" => mat.specular = Self::parse_vec3(&mut tokens, line_num, "Ks")?,
                "d" => mat.dissolve = Self::parse_f32(&mut tokens, line_num, "d")?,
                // Tr is the inverse of d.
                "Tr" => mat.dissolve = 1.0 - Self::parse_f32(&mut tokens, line_num, "Tr")?,
                "map_Kd" => {
                    // Options such as `-s 1 1 1` precede the file name.
                    mat.diffuse_map = tokens.last().map(str::to_string);
                }
                _ => {}
            }
        }

        if let Some(mat) = current {
            materials.insert(mat.name.clone(), mat);
        }

        Ok(materials)
    }

    fn parse_f32<'a>(tokens: &mut impl Iterator<Item = &'a str>, line_num: usize, field: &str) -> Result<f32, String> {
        tokens
            .next()
            .ok_or_else(|| format!("Line {}: {} missing value", line_num + 1, field))?
            .parse()
            .map_err(|_| format!("Line {}: invalid {} value", line_num + 1, field))
    }

    fn parse_vec3<'a>(tokens: &mut impl Iterator<Item = &'a str>, line_num: usize, field: &str) -> Result<Vec3, String> {
        let x = Self::parse_f32(tokens, line_num, field)?;
        let y = Self::parse_f32(tokens, line_num, field)?;
        let z = Self::parse_f32(tokens, line_num, field)?;
        Ok(Vec3::new(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GALLERY_MTL: &str = "\
# exported
newmtl Walls
Ka 0.2 0.2 0.2
Kd 0.9 0.85 0.8
Ks 0.1 0.1 0.1
d 1.0
map_Kd -s 1 1 1 textures/walls.jpg

newmtl Glass
Kd 0.6 0.7 0.9
Tr 0.75
";

    #[test]
    fn test_parses_all_materials() {
        let materials = MtlParser::parse(GALLERY_MTL).unwrap();
        assert_eq!(materials.len(), 2);

        let walls = &materials["Walls"];
        assert_eq!(walls.ambient, Vec3::new(0.2, 0.2, 0.2));
        assert_eq!(walls.diffuse_map.as_deref(), Some("textures/walls.jpg"));

        let glass = &materials["Glass"];
        assert!((glass.dissolve - 0.25).abs() < 1e-6);
        assert_eq!(glass.diffuse_map, None);
        assert_eq!(glass.specular, MtlData::default().specular);
    }

    #[test]
    fn test_converts_to_material() {
        let materials = MtlParser::parse(GALLERY_MTL).unwrap();
        let material = materials["Glass"].to_material();
        assert_eq!(material.diffuse, Vec3::new(0.6, 0.7, 0.9).push(1.0));
        assert!((material.transparency - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_missing_component_is_an_error() {
        let error = MtlParser::parse("newmtl A\nKd 0.5 0.5\n").unwrap_err();
        assert!(error.contains("Line 2"));
    }
}
