use crate::data_structures::{model, primitive::MeshData};

/// Converts parsed OBJ models into mesh data ready for upload.
///
/// Texture v-coordinates are flipped because OBJ uses a bottom-left
/// origin while wgpu samples from the top-left.
pub fn mesh_data_from_obj(models: &[tobj::Model]) -> Vec<MeshData> {
    models
        .iter()
        .map(|m| {
            let vertices = (0..m.mesh.positions.len() / 3)
                .map(|i| model::ModelVertex {
                    position: [
                        m.mesh.positions[i * 3],
                        m.mesh.positions[i * 3 + 1],
                        m.mesh.positions[i * 3 + 2],
                    ],
                    tex_coords: [
                        m.mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                        1.0 - m.mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                    ],
                    normal: [
                        m.mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                    ],
                })
                .collect::<Vec<_>>();

            MeshData {
                vertices,
                indices: m.mesh.indices.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    const TRIANGLE_OBJ: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";

    fn parse(obj: &str) -> Vec<tobj::Model> {
        let mut reader = BufReader::new(Cursor::new(obj));
        let (models, _) = tobj::load_obj_buf(
            &mut reader,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
            |_| Err(tobj::LoadError::OpenFileFailed),
        )
        .unwrap();
        models
    }

    #[test]
    fn converts_a_triangle() {
        let data = mesh_data_from_obj(&parse(TRIANGLE_OBJ));
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].vertices.len(), 3);
        assert_eq!(data[0].indices.len(), 3);
    }

    #[test]
    fn flips_the_v_coordinate() {
        let data = mesh_data_from_obj(&parse(TRIANGLE_OBJ));
        let v = &data[0].vertices[2];
        assert_eq!(v.tex_coords, [0.0, 0.0]);
    }
}
