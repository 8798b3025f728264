//! Wavefront OBJ loader (geometry only)

use std::fs;
use std::path::Path;

use log::{debug, info};
use nom::{
    character::complete::{char, i64 as index, space0, space1},
    combinator::{all_consuming, opt},
    multi::many0,
    number::complete::float,
    sequence::{preceded, tuple},
    IResult,
};
use prism_core::{Color, Mesh, Vec3};

use crate::error::ObjError;

/// Read an OBJ file into a mesh of the given color
pub fn load_obj(path: &Path, color: Color) -> Result<Mesh, ObjError> {
    let text = fs::read_to_string(path).map_err(|source| ObjError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_obj(&text, color)?;
    info!(
        "Loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Parse OBJ text.
///
/// Only `v` and `f` records are read; normals, texture coordinates, groups
/// and materials are skipped. Faces with more than three vertices are split
/// into a fan around their first vertex. Negative indices count back from the
/// last vertex read so far.
pub fn parse_obj(text: &str, color: Color) -> Result<Mesh, ObjError> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    let mut skipped = 0usize;

    for (n, raw) in text.lines().enumerate() {
        let line = n + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        let Some((keyword, rest)) = split_keyword(content) else {
            continue;
        };

        match keyword {
            "v" => {
                let (_, v) = all_consuming(vertex_record)(rest)
                    .map_err(|_| ObjError::Malformed { line, kind: "vertex" })?;
                vertices.push(v);
            }
            "f" => {
                let (_, tokens) = all_consuming(face_record)(rest)
                    .map_err(|_| ObjError::Malformed { line, kind: "face" })?;
                if tokens.len() < 3 {
                    return Err(ObjError::TooFewVertices {
                        line,
                        count: tokens.len(),
                    });
                }

                let polygon = tokens
                    .into_iter()
                    .map(|i| resolve_index(i, vertices.len(), line))
                    .collect::<Result<Vec<_>, _>>()?;
                for k in 1..polygon.len() - 1 {
                    faces.push([polygon[0], polygon[k], polygon[k + 1]]);
                }
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("ignored {} unsupported OBJ records", skipped);
    }
    Ok(Mesh::new(vertices, &faces, color)?)
}

fn split_keyword(line: &str) -> Option<(&str, &str)> {
    if line.is_empty() {
        return None;
    }
    match line.find(char::is_whitespace) {
        Some(at) => Some((&line[..at], &line[at..])),
        None => Some((line, "")),
    }
}

/// 1-based, or negative relative to the vertices read so far, to 0-based.
/// Positive indices past the end are left for the mesh constructor to reject.
fn resolve_index(i: i64, vertex_count: usize, line: usize) -> Result<usize, ObjError> {
    let out_of_range = || ObjError::IndexOutOfRange {
        line,
        index: i,
        vertex_count,
    };

    match i {
        0 => Err(ObjError::ZeroIndex { line }),
        i if i > 0 => usize::try_from(i - 1).map_err(|_| out_of_range()),
        i => {
            let back = usize::try_from(i.unsigned_abs()).map_err(|_| out_of_range())?;
            vertex_count.checked_sub(back).ok_or_else(out_of_range)
        }
    }
}

/// ` x y z [w]`
fn vertex_record(input: &str) -> IResult<&str, Vec3> {
    let (input, x) = preceded(space1, float)(input)?;
    let (input, y) = preceded(space1, float)(input)?;
    let (input, z) = preceded(space1, float)(input)?;
    let (input, _w) = opt(preceded(space1, float))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, Vec3::new(x, y, z)))
}

/// ` v1 v2 v3 ...`, each token `i`, `i/t`, `i//n` or `i/t/n`
fn face_record(input: &str) -> IResult<&str, Vec<i64>> {
    let (input, tokens) = many0(preceded(space1, face_vertex))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, tokens))
}

fn face_vertex(input: &str) -> IResult<&str, i64> {
    let (input, position) = index(input)?;
    let (input, _) = opt(tuple((
        char('/'),
        opt(index),
        opt(preceded(char('/'), opt(index))),
    )))(input)?;
    Ok((input, position))
}
