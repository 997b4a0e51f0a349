// window.rs - Scaled pixel-grid renderer in an eframe window
//
// The window paces itself: a new generation is taken off the channel only once
// `delay` has passed since the previous one.

use std::time::{Duration, Instant};

use conway::stream::TryRecvError;
use conway::{ALIVE, ConsumerEnd, Message, Snapshot};
use eframe::egui;
use egui::{Color32, Rect, Vec2};
use log::{debug, warn};

use crate::RenderError;

#[derive(Debug, Clone)]
pub struct WindowOptions {
    pub title: String,
    /// Side of one cell in pixels.
    pub scale: f32,
    pub inner_size: [f32; 2],
    pub live_color: Color32,
    pub dead_color: Color32,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "Conway's Game of Life".to_string(),
            scale: 6.0,
            inner_size: [640.0, 640.0],
            live_color: Color32::BLACK,
            dead_color: Color32::WHITE,
        }
    }
}

/// Opens the window and renders until the stream ends or the user closes it.
/// Must run on the main thread.
pub fn display(mut end: ConsumerEnd, options: WindowOptions) -> Result<(), RenderError> {
    let Some(delay) = end.blocking_delay() else {
        end.cancel();
        return Err(RenderError::MissingDelay);
    };

    let native = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(options.inner_size),
        ..Default::default()
    };
    let title = options.title.clone();
    let viewer = GridViewer::new(end, delay, options);

    eframe::run_native(&title, native, Box::new(move |_cc| Box::new(viewer)))
        .map_err(|err| RenderError::Window(err.to_string()))
}

struct GridViewer {
    end: ConsumerEnd,
    delay: Duration,
    last_frame: Option<Instant>,
    frame: Option<Snapshot>,
    finished: bool,
    options: WindowOptions,
}

impl GridViewer {
    fn new(end: ConsumerEnd, delay: Duration, options: WindowOptions) -> Self {
        Self {
            end,
            delay,
            last_frame: None,
            frame: None,
            finished: false,
            options,
        }
    }

    fn frame_due(&self) -> bool {
        !self.finished && self.last_frame.is_none_or(|at| at.elapsed() >= self.delay)
    }

    /// Takes at most one message off the channel.
    fn pull(&mut self, ctx: &egui::Context) {
        match self.end.try_recv() {
            Ok(Message::Frame(snapshot)) => {
                self.frame = Some(snapshot);
                self.last_frame = Some(Instant::now());
            }
            Ok(Message::Cancel) | Err(TryRecvError::Disconnected) => {
                debug!("stream ended, closing window");
                self.finished = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            Ok(Message::Delay(_)) => warn!("ignoring repeated frame delay"),
            Err(TryRecvError::Empty) => {}
        }
    }

    fn paint(&self, ui: &mut egui::Ui, snapshot: &Snapshot) {
        let scale = self.options.scale;
        let size = Vec2::new(snapshot.width() as f32 * scale, snapshot.height() as f32 * scale);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
        let origin = response.rect.min;

        painter.rect_filled(response.rect, 0.0, self.options.dead_color);

        for (y, row) in snapshot.rows().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                if cell != ALIVE {
                    continue;
                }
                let min = origin + Vec2::new(x as f32 * scale, y as f32 * scale);
                painter.rect_filled(Rect::from_min_size(min, Vec2::splat(scale)), 0.0, self.options.live_color);
            }
        }
    }
}

impl eframe::App for GridViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.frame_due() {
            self.pull(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| match &self.frame {
            Some(snapshot) => {
                ui.label(format!(
                    "Generation: {}   Live cells: {}",
                    snapshot.generation(),
                    snapshot.live_cells()
                ));
                ui.separator();
                egui::ScrollArea::both().show(ui, |ui| self.paint(ui, snapshot));
            }
            None => {
                ui.label("Waiting for the first generation...");
            }
        });

        if !self.finished {
            ctx.request_repaint_after(self.delay);
        }
    }
}

impl Drop for GridViewer {
    // Closing the window before the sentinel arrived stops the producer too.
    fn drop(&mut self) {
        if !self.finished && self.end.cancel() {
            debug!("window closed early, cancellation sent");
        }
    }
}
