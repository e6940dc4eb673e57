use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use menger_mesh::Mesh;

/// Writes `mesh` as Wavefront OBJ: one `v` line per vertex, one 1-based `f`
/// line per quad in stored winding order.
pub fn write_obj<W: Write>(mesh: &Mesh, out: W) -> io::Result<()> {
    let mut w = BufWriter::new(out);
    writeln!(
        w,
        "# menger sponge: {} vertices, {} faces",
        mesh.vertex_count(),
        mesh.face_count()
    )?;
    writeln!(w, "o MengerSponge")?;
    for v in &mesh.vertices {
        writeln!(w, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for &[a, b, c, d] in &mesh.faces {
        writeln!(w, "f {} {} {} {}", a + 1, b + 1, c + 1, d + 1)?;
    }
    w.flush()
}

pub fn write_obj_file(mesh: &Mesh, path: &Path) -> io::Result<()> {
    write_obj(mesh, File::create(path)?)
}
