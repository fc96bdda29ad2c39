//! EV Population Chart Window
//! Native window that displays the aggregated bar chart. Dataset loading and
//! aggregation run on a background thread so the UI stays responsive.

use crate::charts::{ChartData, ChartPlotter, CHART_TITLE};
use crate::data::DataSource;
use crate::stats::Aggregator;
use egui::RichText;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// Loading result from the background thread.
enum LoadResult {
    Progress(String),
    Complete(ChartData),
    Error(String),
}

/// Main application window.
pub struct ChartApp {
    chart: Option<ChartData>,
    status: String,
    load_rx: Option<Receiver<LoadResult>>,
}

impl ChartApp {
    /// Display already-computed chart data.
    pub fn with_chart(chart: ChartData) -> Self {
        Self {
            chart: Some(chart),
            status: String::new(),
            load_rx: None,
        }
    }

    /// Load and aggregate the source on a background thread, then display
    /// the chart. Failures are shown as status text in the window.
    pub fn load_in_background(source: DataSource) -> Self {
        let (tx, rx) = channel();

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress("Loading dataset...".to_string()));

            let result = Aggregator::from_source(source)
                .map_err(|e| e.to_string())
                .and_then(|agg| agg.chart_data().map_err(|e| e.to_string()));

            match result {
                Ok(chart) => {
                    let _ = tx.send(LoadResult::Complete(chart));
                }
                Err(error) => {
                    let _ = tx.send(LoadResult::Error(error));
                }
            }
        });

        Self {
            chart: None,
            status: "Loading dataset...".to_string(),
            load_rx: Some(rx),
        }
    }

    /// Run the native window until it is closed.
    pub fn run(self) -> anyhow::Result<()> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1200.0, 600.0])
                .with_title("EV Population"),
            ..Default::default()
        };

        eframe::run_native(
            "EV Population",
            options,
            Box::new(move |_cc| Ok(Box::new(self))),
        )
        .map_err(|e| anyhow::anyhow!("chart window failed: {e}"))
    }

    /// Check for loading results from the background thread.
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.status = status;
                    }
                    LoadResult::Complete(chart) => {
                        self.chart = Some(chart);
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.status = format!("Error: {}", error);
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    fn draw_chart_card(ui: &mut egui::Ui, chart: &ChartData) {
        ui.vertical(|ui| {
            ui.label(RichText::new(CHART_TITLE).size(18.0).strong());
            ui.add_space(8.0);

            // Legend: one color square per make
            ui.horizontal_wrapped(|ui| {
                for (series_idx, series) in chart.series.iter().enumerate() {
                    let color = ChartPlotter::series_color(series_idx);
                    let (rect, _) =
                        ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                    ui.painter().rect_filled(rect, 3.0, color);
                    ui.label(RichText::new(&series.make).size(12.0));
                    ui.add_space(10.0);
                }
            });

            ui.add_space(10.0);
            ChartPlotter::draw_msrp_chart(ui, chart);
        });
    }
}

impl eframe::App for ChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Repaint until the background load settles
        if self.load_rx.is_some() {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| match &self.chart {
            Some(chart) if !chart.is_empty() => {
                Self::draw_chart_card(ui, chart);
            }
            Some(_) => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No Data").size(20.0));
                });
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new(self.status.as_str()).size(16.0));
                });
            }
        });
    }
}
