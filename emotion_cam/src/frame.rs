use emotion_wise::RenderError;
use emotion_wise::overlay::{Canvas, Color, Rect, TextItem};
use opencv::{
    core::{self, Mat, Scalar},
    imgproc,
};

/// A captured BGR frame that the overlay can be drawn onto.
pub struct CameraFrame {
    pub mat: Mat,
}

impl CameraFrame {
    pub fn new(mat: Mat) -> Self {
        Self { mat }
    }
}

fn bgr(color: Color) -> Scalar {
    Scalar::new(color.b as f64, color.g as f64, color.r as f64, 0.0)
}

fn render_error(e: opencv::Error) -> RenderError {
    RenderError(e.to_string())
}

impl Canvas for CameraFrame {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), RenderError> {
        let rect = core::Rect::new(rect.x, rect.y, rect.width, rect.height);
        imgproc::rectangle(&mut self.mat, rect, bgr(color), imgproc::FILLED, imgproc::LINE_8, 0).map_err(render_error)
    }

    fn draw_text(&mut self, item: &TextItem) -> Result<(), RenderError> {
        imgproc::put_text(
            &mut self.mat,
            &item.text,
            core::Point::new(item.origin.x, item.origin.y),
            imgproc::FONT_HERSHEY_SIMPLEX,
            item.scale,
            bgr(item.color),
            item.thickness,
            imgproc::LINE_8,
            false,
        )
        .map_err(render_error)
    }
}
