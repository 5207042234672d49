use super::gl_types::{GlVertexArray, GlVertexBuffer, Graphics};

/// Three vertices, `xyz` each, in normalized device coordinates.
pub const TRIANGLE: [f32; 9] = [
    -0.5, -0.5, 0.0,
    0.5, -0.5, 0.0,
    0.0, 0.5, 0.0,
];

/// Attribute slot the vertex shader reads positions from (`layout (location = 0)`).
pub const POSITION_ATTRIB: u32 = 0;

/// Components per position.
pub const POSITION_COMPONENTS: i32 = 3;

/// Uploads a triangle into a fresh vertex buffer and records its layout in a fresh vertex array.
///
/// Both bindings are cleared before returning, so nothing after this can accidentally write
/// through them. The render loop rebinds the vertex array explicitly every frame.
pub fn upload_triangle<G: Graphics>(gl: &G, vertices: &[f32; 9]) -> (GlVertexArray, GlVertexBuffer) {
    let vao = GlVertexArray::generate(gl);
    let vbo = GlVertexBuffer::generate(gl);

    vao.bind(gl);
    vbo.bind(gl);
    gl.buffer_data_static(vertices);
    log::debug!("Created & bound VAO & VBO");

    gl.vertex_attrib_pointer(POSITION_ATTRIB, POSITION_COMPONENTS);
    gl.enable_vertex_attrib_array(POSITION_ATTRIB);

    GlVertexBuffer::clear_binding(gl);
    GlVertexArray::clear_binding(gl);

    (vao, vbo)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graphics::mock::{Call, RecordingGl};

    #[test]
    fn uploaded_vertices_read_back_bit_for_bit() {
        let gl = RecordingGl::new();
        let (_vao, vbo) = upload_triangle(&gl, &TRIANGLE);

        let stored = gl.buffer_contents(vbo.id()).unwrap();
        let expected: Vec<u32> = TRIANGLE.iter().map(|f| f.to_bits()).collect();
        let actual: Vec<u32> = stored.iter().map(|f| f.to_bits()).collect();

        assert_eq!(actual, expected);
    }

    #[test]
    fn layout_is_recorded_while_the_vertex_array_is_bound() {
        let gl = RecordingGl::new();
        let (vao, vbo) = upload_triangle(&gl, &TRIANGLE);

        let calls = gl.calls();
        let bind_vao = calls.iter().position(|c| *c == Call::BindVertexArray(vao.id())).unwrap();
        let bind_vbo = calls.iter().position(|c| *c == Call::BindArrayBuffer(vbo.id())).unwrap();
        let upload = calls.iter().position(|c| *c == Call::BufferData(vbo.id())).unwrap();
        let attrib = calls.iter().position(|c| *c == Call::VertexAttribPointer(0, 3)).unwrap();
        let enable = calls.iter().position(|c| *c == Call::EnableVertexAttribArray(0)).unwrap();

        assert!(bind_vao < bind_vbo);
        assert!(bind_vbo < upload);
        assert!(upload < attrib);
        assert!(attrib < enable);
    }

    #[test]
    fn bindings_are_cleared_afterwards() {
        let gl = RecordingGl::new();
        upload_triangle(&gl, &TRIANGLE);

        assert_eq!(gl.bound_vertex_array(), 0);
        assert_eq!(gl.bound_array_buffer(), 0);
    }

    #[test]
    fn exactly_one_array_and_one_buffer_are_generated() {
        let gl = RecordingGl::new();
        upload_triangle(&gl, &TRIANGLE);

        assert_eq!(gl.count(|c| matches!(c, Call::GenVertexArray(_))), 1);
        assert_eq!(gl.count(|c| matches!(c, Call::GenBuffer(_))), 1);
        assert_eq!(gl.count(|c| matches!(c, Call::BufferData(_))), 1);
    }
}
