#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;
use taskboard_core::board::{BoardView, TaskBoard};
use taskboard_core::event::{CancelReason, InputEvent, PointerEvent, PointerEventKind};
use taskboard_core::geometry::{Rect, Size};
use taskboard_core::task::{FixedClock, Task, TaskId, TaskStatus};
use taskboard_dnd::{DragDropEngine, EngineConfig, FrameDriver, FrameId, ItemRect, LayoutSnapshot};
use web_time::Instant;

#[derive(Debug, Arbitrary)]
enum Op {
    Pointer {
        kind: u8,
        touch: bool,
        x: i16,
        y: i16,
    },
    Interrupt(u8),
    Frame,
    Tick(u16),
}

#[derive(Default)]
struct Frames {
    next: u64,
    live: Option<FrameId>,
}

impl FrameDriver for Frames {
    fn request_frame(&mut self) -> FrameId {
        assert!(self.live.is_none(), "second frame requested while one is live");
        self.next += 1;
        let id = FrameId(self.next);
        self.live = Some(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        assert_eq!(self.live, Some(id), "cancelled a frame that is not live");
        self.live = None;
    }
}

fn layout_for(board: &TaskBoard) -> LayoutSnapshot {
    let mut layout = LayoutSnapshot::new(Size::new(900.0, 1200.0));
    for status in TaskStatus::COLUMNS {
        let x = status.column_index().unwrap_or(0) as f32 * 300.0;
        let items = board
            .column(status)
            .iter()
            .enumerate()
            .map(|(i, id)| ItemRect::new(id.clone(), Rect::new(x, 100.0 + i as f32 * 50.0, 300.0, 40.0)))
            .collect();
        layout = layout.with_container(status, Rect::new(x, 0.0, 300.0, 1200.0), items);
    }
    layout
}

fuzz_target!(|ops: Vec<Op>| {
    let day = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    let tasks = (0..6).map(|i| {
        Task::new(format!("t{i}"), "fuzz", day).with_status(TaskStatus::COLUMNS[i % 3])
    });
    let mut board = TaskBoard::from_tasks(tasks, FixedClock(day)).expect("unique ids");
    let config = EngineConfig {
        max_session_lifetime_ms: Some(2_000),
        ..EngineConfig::default()
    };
    let mut engine = DragDropEngine::new(config, Frames::default()).expect("valid config");
    let mut now = Instant::now();

    for op in ops.into_iter().take(256) {
        let layout = layout_for(&board);
        match op {
            Op::Pointer { kind, touch, x, y } => {
                let kind = match kind % 4 {
                    0 => PointerEventKind::Down,
                    1 => PointerEventKind::Move,
                    2 => PointerEventKind::Up,
                    _ => PointerEventKind::Cancel,
                };
                let (x, y) = (f32::from(x) / 20.0, f32::from(y) / 20.0);
                let event = if touch {
                    PointerEvent::touch(5, kind, x, y)
                } else {
                    PointerEvent::mouse(kind, x, y)
                };
                engine.handle_pointer(event, now, &layout, &mut board);
            }
            Op::Interrupt(r) => {
                let reason = match r % 3 {
                    0 => CancelReason::FocusLost,
                    1 => CancelReason::OrientationChanged,
                    _ => CancelReason::CompetingGesture,
                };
                engine.handle_pointer(InputEvent::Interrupt(reason), now, &layout, &mut board);
            }
            Op::Frame => {
                if let Some(id) = engine.driver_mut().live.take() {
                    assert!(engine.on_frame(id).is_some(), "live frame ignored");
                }
            }
            Op::Tick(ms) => {
                now += Duration::from_millis(u64::from(ms));
                engine.check_expired(now);
            }
        }

        // Idle engines never keep a frame alive.
        if !engine.is_dragging() {
            assert!(engine.driver().live.is_none(), "scroll running while idle");
            assert!(engine.placeholder().is_none());
        }
        // Every task is in exactly one column.
        let mut seen: Vec<&TaskId> = TaskStatus::COLUMNS
            .iter()
            .flat_map(|s| board.column(*s).iter())
            .collect();
        assert_eq!(seen.len(), 6, "task lost or duplicated");
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 6, "task lost or duplicated");
    }
});
