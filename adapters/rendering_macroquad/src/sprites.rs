use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use cowboy_shooter_core::{ProjectileKind, Rect};
use cowboy_shooter_rendering::{Color, SpriteKey};
use macroquad::{
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};

use crate::{to_macroquad_color, SceneMetrics};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Colors used to draw bullets, keyed by who fired them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ProjectilePalette {
    player: Color,
    enemy: Color,
}

impl Default for ProjectilePalette {
    fn default() -> Self {
        Self {
            player: Color::from_rgb_u8(250, 210, 60),
            enemy: Color::from_rgb_u8(200, 40, 40),
        }
    }
}

impl ProjectilePalette {
    pub(crate) fn color(&self, kind: ProjectileKind) -> Color {
        match kind {
            ProjectileKind::Player => self.player,
            ProjectileKind::Enemy => self.enemy,
        }
    }

    fn set(&mut self, kind: ProjectileKind, color: Color) {
        match kind {
            ProjectileKind::Player => self.player = color,
            ProjectileKind::Enemy => self.enemy = color,
        }
    }
}

/// Read-only resources loaded once before the first frame.
#[derive(Debug, Default)]
pub(crate) struct ResourceSet {
    atlas: Option<SpriteAtlas>,
    palette: ProjectilePalette,
}

impl ResourceSet {
    /// Flat-colour placeholders for every sprite and the default palette.
    pub(crate) fn placeholders() -> Self {
        Self::default()
    }

    /// Loads textures and palette overrides from the manifest at `path`.
    pub(crate) fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    pub(crate) fn atlas(&self) -> Option<&SpriteAtlas> {
        self.atlas.as_ref()
    }

    pub(crate) fn palette(&self) -> &ProjectilePalette {
        &self.palette
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read resource manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let parsed = parse_manifest(&contents, &base)?;
        let atlas = SpriteAtlas::from_entries(parsed.sprites, &mut loader)?;
        log::info!(
            "loaded {} sprites from {}",
            atlas.texture_count(),
            manifest_path.display()
        );

        Ok(Self {
            atlas: Some(atlas),
            palette: parsed.palette,
        })
    }
}

/// Cache of textures loaded from the resource manifest.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// Draws the requested sprite stretched over `bounds`.
    pub(crate) fn draw(
        &self,
        key: SpriteKey,
        bounds: Rect,
        metrics: &SceneMetrics,
        tint: Color,
    ) -> Result<()> {
        let texture = *self
            .textures
            .get(&key)
            .with_context(|| format!("sprite {key} missing from atlas"))?;

        let origin = metrics.to_screen(bounds.origin());
        let size = bounds.size() * metrics.scale();
        let draw_params = DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(size.x, size.y)),
            ..DrawTextureParams::default()
        };

        texture::draw_texture_ex(
            texture,
            origin.x,
            origin.y,
            to_macroquad_color(tint),
            draw_params,
        );

        Ok(())
    }

    /// Returns the number of textures stored in the atlas.
    pub(crate) fn texture_count(&self) -> usize {
        self.textures.len()
    }

    #[cfg(test)]
    fn contains(&self, key: SpriteKey) -> bool {
        self.textures.contains_key(&key)
    }

    fn from_entries(
        entries: Vec<(SpriteKey, PathBuf)>,
        loader: &mut impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = HashMap::with_capacity(entries.len());
        for (key, path) in entries {
            let texture = loader(key, &path).with_context(|| {
                format!("failed to load sprite {key} from {}", path.display())
            })?;
            if textures.insert(key, texture).is_some() {
                bail!("duplicate sprite entry for {key}");
            }
        }
        Ok(Self { textures })
    }
}

fn default_loader(_key: SpriteKey, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    sprites: HashMap<String, String>,
    #[serde(default)]
    projectiles: HashMap<String, [u8; 3]>,
}

#[derive(Debug, PartialEq)]
struct ParsedManifest {
    sprites: Vec<(SpriteKey, PathBuf)>,
    palette: ProjectilePalette,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<ParsedManifest> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse resource manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported resource manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::new();
    for (name, relative_path) in manifest.sprites {
        let key = name
            .parse::<SpriteKey>()
            .context("resource manifest lists an unknown sprite")?;
        let _ = resolved.insert(key, base_path.join(relative_path));
    }

    let mut sprites = Vec::with_capacity(SpriteKey::ALL.len());
    for key in SpriteKey::ALL {
        let Some(path) = resolved.remove(&key) else {
            bail!("resource manifest missing entry for sprite {key}");
        };
        sprites.push((key, path));
    }

    let mut palette = ProjectilePalette::default();
    for (name, [red, green, blue]) in manifest.projectiles {
        let kind = name
            .parse::<ProjectileKind>()
            .context("resource manifest colours an unknown projectile")?;
        palette.set(kind, Color::from_rgb_u8(red, green, blue));
    }

    Ok(ParsedManifest { sprites, palette })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const FULL_SPRITES: &str = r#"
        [sprites]
        heal = "pickups/heal.png"
        cowboy = "cowboy.png"
        eagle = "enemies/eagle.png"
        bandit = "enemies/bandit.png"
        booster = "pickups/booster.png"
    "#;

    #[test]
    fn manifest_requires_every_sprite() {
        let manifest = r#"
            version = 1

            [sprites]
            cowboy = "cowboy.png"
            bandit = "bandit.png"
        "#;

        let error = parse_manifest(manifest, Path::new("assets"))
            .expect_err("manifest missing sprites should fail");
        assert!(error.to_string().contains("eagle"), "{error}");
    }

    #[test]
    fn manifest_rejects_unknown_sprites() {
        let manifest = format!("version = 1\n{FULL_SPRITES}\ncactus = \"cactus.png\"\n");

        let error = parse_manifest(&manifest, Path::new("assets"))
            .expect_err("unknown sprites are fatal");
        assert!(format!("{error:#}").contains("cactus"), "{error:#}");
    }

    #[test]
    fn manifest_rejects_other_versions() {
        let manifest = format!("version = 2\n{FULL_SPRITES}");

        assert!(parse_manifest(&manifest, Path::new("assets")).is_err());
    }

    #[test]
    fn manifest_resolves_paths_in_canonical_order() {
        let manifest = format!("version = 1\n{FULL_SPRITES}");

        let parsed = parse_manifest(&manifest, Path::new("root")).expect("manifest should parse");

        let expected = vec![
            (SpriteKey::Cowboy, PathBuf::from("root/cowboy.png")),
            (SpriteKey::Bandit, PathBuf::from("root/enemies/bandit.png")),
            (SpriteKey::Eagle, PathBuf::from("root/enemies/eagle.png")),
            (SpriteKey::Booster, PathBuf::from("root/pickups/booster.png")),
            (SpriteKey::Heal, PathBuf::from("root/pickups/heal.png")),
        ];
        assert_eq!(parsed.sprites, expected);
        assert_eq!(parsed.palette, ProjectilePalette::default());
    }

    #[test]
    fn manifest_overrides_projectile_colours() {
        let manifest = format!(
            "version = 1\n[projectiles]\nenemy = [0, 0, 255]\n{FULL_SPRITES}"
        );

        let parsed = parse_manifest(&manifest, Path::new("assets")).expect("manifest should parse");

        assert_eq!(
            parsed.palette.color(ProjectileKind::Enemy),
            Color::from_rgb_u8(0, 0, 255)
        );
        assert_eq!(
            parsed.palette.color(ProjectileKind::Player),
            ProjectilePalette::default().color(ProjectileKind::Player)
        );
    }

    #[test]
    fn manifest_rejects_unknown_projectile_kinds() {
        let manifest = format!(
            "version = 1\n[projectiles]\nlaser = [0, 0, 255]\n{FULL_SPRITES}"
        );

        let error = parse_manifest(&manifest, Path::new("assets"))
            .expect_err("unknown projectile kinds are fatal");
        assert!(format!("{error:#}").contains("laser"), "{error:#}");
    }

    #[test]
    fn atlas_loads_each_texture_once_in_canonical_order() {
        let manifest = format!("version = 1\n{FULL_SPRITES}");
        let parsed = parse_manifest(&manifest, Path::new("assets")).expect("manifest should parse");
        let load_order = RefCell::new(Vec::new());

        let atlas = SpriteAtlas::from_entries(parsed.sprites, &mut |key, _| {
            load_order.borrow_mut().push(key);
            Ok(Texture2D::empty())
        })
        .expect("atlas should load using provided loader");

        assert_eq!(load_order.borrow().as_slice(), &SpriteKey::ALL);
        assert_eq!(atlas.texture_count(), SpriteKey::ALL.len());
        for key in SpriteKey::ALL {
            assert!(atlas.contains(key));
        }
    }

    #[test]
    fn failing_loader_names_the_sprite() {
        let entries = vec![(SpriteKey::Eagle, PathBuf::from("eagle.png"))];

        let error = SpriteAtlas::from_entries(entries, &mut |_, _| bail!("disk on fire"))
            .expect_err("loader failures propagate");

        assert!(format!("{error:#}").contains("eagle"), "{error:#}");
    }
}
