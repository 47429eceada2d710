use super::Point;

/// One span of a cardinal (Catmull-Rom family) spline, running from `p1` to
/// `p2` with `p0` and `p3` as the neighbouring control points. A tension of
/// 0.5 gives the classic Catmull-Rom curve.
pub struct CatmullRomSegment {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub x3: f32,
    pub y3: f32,
    pub tension: f32,
}

impl CatmullRomSegment {
    pub fn new(p0: Point, p1: Point, p2: Point, p3: Point, tension: f32) -> CatmullRomSegment {
        CatmullRomSegment {
            x0: p0.x,
            y0: p0.y,
            x1: p1.x,
            y1: p1.y,
            x2: p2.x,
            y2: p2.y,
            x3: p3.x,
            y3: p3.y,
            tension: tension,
        }
    }

    // Tangents at the span's endpoints
    fn get_tangent_x1(&self) -> f32 {
        self.tension * (self.x2 - self.x0)
    }
    fn get_tangent_y1(&self) -> f32 {
        self.tension * (self.y2 - self.y0)
    }
    fn get_tangent_x2(&self) -> f32 {
        self.tension * (self.x3 - self.x1)
    }
    fn get_tangent_y2(&self) -> f32 {
        self.tension * (self.y3 - self.y1)
    }

    // Hermite form expanded into a*t^3 + b*t^2 + c*t + d
    fn get_cubic_ax(&self) -> f32 {
        2.0 * self.x1 - 2.0 * self.x2 + self.get_tangent_x1() + self.get_tangent_x2()
    }
    fn get_cubic_ay(&self) -> f32 {
        2.0 * self.y1 - 2.0 * self.y2 + self.get_tangent_y1() + self.get_tangent_y2()
    }
    fn get_cubic_bx(&self) -> f32 {
        3.0 * (self.x2 - self.x1) - 2.0 * self.get_tangent_x1() - self.get_tangent_x2()
    }
    fn get_cubic_by(&self) -> f32 {
        3.0 * (self.y2 - self.y1) - 2.0 * self.get_tangent_y1() - self.get_tangent_y2()
    }

    pub fn get_x_on_curve(&self, t: f32) -> f32 {
        let t_squared = t * t;
        let t_cubed = t * t_squared;
        (self.get_cubic_ax() * t_cubed) + (self.get_cubic_bx() * t_squared) + (self.get_tangent_x1() * t) + self.x1
    }

    pub fn get_y_on_curve(&self, t: f32) -> f32 {
        let t_squared = t * t;
        let t_cubed = t * t_squared;
        (self.get_cubic_ay() * t_cubed) + (self.get_cubic_by() * t_squared) + (self.get_tangent_y1() * t) + self.y1
    }

    pub fn point_at(&self, t: f32) -> Point {
        Point::new(self.get_x_on_curve(t), self.get_y_on_curve(t))
    }
}
