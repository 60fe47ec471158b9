use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use voxstack_blocks::{SubVoxel, Voxel, VoxelType};
use voxstack_edit::Edit;

/// Scene description: world defaults, voxel fills, then single sub-cell carves.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct SceneConfig {
    #[serde(default)]
    pub world: WorldSection,
    #[serde(default)]
    pub fill: Vec<FillRule>,
    #[serde(default)]
    pub carve: Vec<CarveRule>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldSection {
    /// Occupancy written to every voxel of every chunk before the fill rules.
    #[serde(default = "default_empty")]
    pub base: MaskSpec,
    #[serde(default)]
    pub base_type: VoxelType,
    /// Assemble a debug mesh for each rebuilt chunk.
    #[serde(default)]
    pub mesh: bool,
}

impl Default for WorldSection {
    fn default() -> Self {
        Self { base: default_empty(), base_type: 0, mesh: false }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct FillRule {
    pub chunk: [u32; 3],
    /// Whole chunk when absent.
    #[serde(default)]
    pub voxel: Option<[u32; 3]>,
    #[serde(default = "default_type")]
    pub ty: VoxelType,
    #[serde(default = "default_full")]
    pub mask: MaskSpec,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CarveRule {
    pub chunk: [u32; 3],
    pub voxel: [u32; 3],
    pub cell: [u32; 3],
    #[serde(default)]
    pub solid: bool,
}

/// Occupancy as a named preset or a raw 64-bit mask. TOML integers are
/// signed, so the mask's bit pattern is taken as-is.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MaskSpec {
    Preset(MaskPreset),
    Bits(i64),
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MaskPreset {
    Full,
    Empty,
    /// Alternating sub-cells, the worst case for exposed faces.
    Checker,
    /// Lower half of the voxel.
    Slab,
}

fn default_empty() -> MaskSpec {
    MaskSpec::Preset(MaskPreset::Empty)
}
fn default_full() -> MaskSpec {
    MaskSpec::Preset(MaskPreset::Full)
}
fn default_type() -> VoxelType {
    1
}

impl MaskSpec {
    pub fn to_subvoxel(self) -> SubVoxel {
        match self {
            MaskSpec::Bits(b) => SubVoxel::new(b as u64),
            MaskSpec::Preset(MaskPreset::Full) => SubVoxel::FULL,
            MaskSpec::Preset(MaskPreset::Empty) => SubVoxel::EMPTY,
            MaskSpec::Preset(MaskPreset::Checker) => SubVoxel::from_fn(|x, y, z| (x + y + z) % 2 == 0),
            MaskSpec::Preset(MaskPreset::Slab) => SubVoxel::from_fn(|_, y, _| y < 2),
        }
    }
}

fn tuple(a: [u32; 3]) -> (u32, u32, u32) {
    (a[0], a[1], a[2])
}

fn whole_chunk(chunk: (u32, u32, u32), value: Voxel) -> impl Iterator<Item = Edit> {
    (0..4u32).flat_map(move |z| {
        (0..4u32).flat_map(move |y| (0..4u32).map(move |x| Edit::Voxel { chunk, voxel: (x, y, z), value }))
    })
}

impl SceneConfig {
    /// Flattens the scene into edits in application order: base, fills, carves.
    pub fn edits(&self) -> Vec<Edit> {
        let mut out = Vec::new();
        let base = Voxel::new(self.world.base_type, self.world.base.to_subvoxel());
        if base != Voxel::EMPTY {
            for cz in 0..4 {
                for cy in 0..4 {
                    for cx in 0..4 {
                        out.extend(whole_chunk((cx, cy, cz), base));
                    }
                }
            }
        }
        for rule in &self.fill {
            let value = Voxel::new(rule.ty, rule.mask.to_subvoxel());
            let chunk = tuple(rule.chunk);
            match rule.voxel {
                Some(v) => out.push(Edit::Voxel { chunk, voxel: tuple(v), value }),
                None => out.extend(whole_chunk(chunk, value)),
            }
        }
        out.extend(self.carve.iter().map(|c| Edit::SubCell {
            chunk: tuple(c.chunk),
            voxel: tuple(c.voxel),
            cell: tuple(c.cell),
            solid: c.solid,
        }));
        out
    }

    /// Scene used when no file is given: a ground layer of chunks, a
    /// checkered pillar, and a few carved notches.
    pub fn demo() -> Self {
        let mut fill = Vec::new();
        for cz in 0..4 {
            for cx in 0..4 {
                fill.push(FillRule { chunk: [cx, 0, cz], voxel: None, ty: 1, mask: default_full() });
            }
        }
        for vy in 0..4 {
            fill.push(FillRule {
                chunk: [1, 1, 1],
                voxel: Some([1, vy, 1]),
                ty: 2,
                mask: MaskSpec::Preset(MaskPreset::Checker),
            });
        }
        fill.push(FillRule {
            chunk: [2, 1, 2],
            voxel: Some([0, 0, 0]),
            ty: 3,
            mask: MaskSpec::Preset(MaskPreset::Slab),
        });
        let carve = (0..4)
            .map(|i| CarveRule { chunk: [0, 0, 0], voxel: [i, 3, 0], cell: [i, 3, 0], solid: false })
            .collect();
        Self { world: WorldSection::default(), fill, carve }
    }
}

pub fn load_scene_from_path(path: &Path) -> Result<SceneConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: SceneConfig = toml::from_str(&s)?;
    Ok(cfg)
}
