use cgmath::{Point3, Vector3};

/// A merged rectangle of coplanar unit faces, ready for triangulation.
///
/// Vertices are stored in counter-clockwise order when viewed from the side
/// the normal points to, so `(0, 1, 2)` and `(0, 2, 3)` are the two front
/// facing triangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Corner positions in world space
    pub positions: [Point3<f32>; 4],
    /// Unit normal shared by all four corners
    pub normal: Vector3<f32>,
    /// Texture coordinates per corner, in the same order as `positions`
    pub uvs: [[f32; 2]; 4],
    /// Material index, see [`super::FaceType::material`]
    pub material: u32,
}

impl Quad {
    /// The per-vertex normals (all equal).
    pub fn normals(&self) -> [Vector3<f32>; 4] {
        [self.normal; 4]
    }

    /// Integer bounding box of the quad as `(min, max)` corners.
    ///
    /// Quads always lie on integer grid lines, so the bounds are exact. One
    /// component of `min` and `max` is equal: the plane the quad lies in.
    pub fn bounds(&self) -> (Point3<i32>, Point3<i32>) {
        let mut min = self.positions[0];
        let mut max = self.positions[0];
        for corner in &self.positions[1..] {
            min = Point3::new(min.x.min(corner.x), min.y.min(corner.y), min.z.min(corner.z));
            max = Point3::new(max.x.max(corner.x), max.y.max(corner.y), max.z.max(corner.z));
        }
        let round = |p: Point3<f32>| Point3::new(p.x.round() as i32, p.y.round() as i32, p.z.round() as i32);
        (round(min), round(max))
    }

    /// Surface area in unit faces.
    pub fn area(&self) -> i64 {
        let (min, max) = self.bounds();
        let extent = max - min;
        [extent.x, extent.y, extent.z]
            .into_iter()
            .filter(|length| *length != 0)
            .map(i64::from)
            .product()
    }
}
