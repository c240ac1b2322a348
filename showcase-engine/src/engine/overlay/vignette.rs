use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

pub const VIGNETTE_DARKNESS: f32 = 0.35;
pub const VIGNETTE_OFFSET: f32 = 0.3;

const VIGNETTE_TEXTURE_SIZE: u32 = 128;

/// Edge darkening drawn over the canvas and under the document.
/// Kept on every tier; it costs one textured quad.
#[derive(Component)]
pub struct Vignette;

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Black overlay alpha at `distance` from the centre in UV space.
/// The edges are reversed so brightness falls off with distance.
pub fn vignette_alpha(distance: f32, darkness: f32, offset: f32) -> f32 {
    let brightness = smoothstep(0.8, offset * 0.799, distance * (darkness + offset));
    1.0 - brightness
}

pub fn vignette_image(darkness: f32, offset: f32) -> Image {
    let size = VIGNETTE_TEXTURE_SIZE;
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let uv = Vec2::new(
                (x as f32 + 0.5) / size as f32,
                (y as f32 + 0.5) / size as f32,
            );
            let alpha = vignette_alpha(uv.distance(Vec2::splat(0.5)), darkness, offset);
            data.extend_from_slice(&[0, 0, 0, (alpha * 255.0).round() as u8]);
        }
    }

    Image::new(
        Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    )
}

pub fn spawn_vignette(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    let image = images.add(vignette_image(VIGNETTE_DARKNESS, VIGNETTE_OFFSET));
    commands.spawn((
        ImageNode::new(image),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        GlobalZIndex(-1),
        Vignette,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn centre_is_clear_and_corners_darken() {
        assert_eq!(vignette_alpha(0.0, VIGNETTE_DARKNESS, VIGNETTE_OFFSET), 0.0);
        let corner = vignette_alpha(0.5_f32.hypot(0.5), VIGNETTE_DARKNESS, VIGNETTE_OFFSET);
        assert!(corner > 0.25 && corner < 0.45, "corner alpha {corner}");

        let mut previous = 0.0;
        for step in 0..=10 {
            let alpha = vignette_alpha(step as f32 * 0.07, VIGNETTE_DARKNESS, VIGNETTE_OFFSET);
            assert!(alpha >= previous);
            previous = alpha;
        }
    }

    #[test]
    fn image_is_transparent_in_the_middle() {
        let image = vignette_image(VIGNETTE_DARKNESS, VIGNETTE_OFFSET);
        let data = image.data.as_ref().unwrap();
        let size = VIGNETTE_TEXTURE_SIZE as usize;
        assert_eq!(data.len(), size * size * 4);

        let centre = ((size / 2) * size + size / 2) * 4;
        assert_eq!(data[centre + 3], 0);
        assert!(data[3] > 0);
        assert_relative_eq!(
            data[3] as f32 / 255.0,
            vignette_alpha(
                Vec2::splat(0.5 / size as f32).distance(Vec2::splat(0.5)),
                VIGNETTE_DARKNESS,
                VIGNETTE_OFFSET
            ),
            epsilon = 1.0 / 255.0
        );
    }
}
