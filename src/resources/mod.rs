use std::io::{BufReader, Cursor};

use crate::data_structures::model;

/**
 * This module contains all logic for loading meshes/textures/etc. from external files.
 */
pub mod mesh;
pub mod texture;

/// Loads an OBJ file and textures every sub-mesh with `texture_file`.
///
/// Materials declared in the OBJ itself are ignored; the whole model gets
/// one material with a white color factor.
pub async fn load_model_obj(
    file_name: &str,
    texture_file: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<model::Model> {
    let obj_text = texture::load_string(file_name).await?;
    let obj_cursor = Cursor::new(obj_text);
    let mut obj_reader = BufReader::new(obj_cursor);

    let (models, _materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |p| async move {
            let mat_text = texture::load_string(&p).await.unwrap_or_default();
            tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mat_text)))
        },
    )
    .await?;

    let diffuse_texture = texture::load_texture(texture_file, device, queue).await?;
    let layout = texture::material_layout(device);
    let material = model::Material::new(
        device,
        texture_file,
        diffuse_texture,
        [1.0, 1.0, 1.0, 1.0],
        &layout,
    );

    let meshes = mesh::mesh_data_from_obj(&models)
        .iter()
        .map(|data| data.upload(device, file_name, 0))
        .collect();

    Ok(model::Model {
        meshes,
        materials: vec![material],
    })
}
