use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::foundation::core::Dimensions;

#[derive(Default)]
struct Log {
    events: Vec<String>,
}

struct Scripted {
    name: String,
    log: Rc<RefCell<Log>>,
    open_error: Option<String>,
    reads: Vec<FramelabResult<Option<PixelBuffer>>>,
}

impl Scripted {
    fn new(name: &str, log: &Rc<RefCell<Log>>) -> Self {
        Self {
            name: name.to_string(),
            log: Rc::clone(log),
            open_error: None,
            reads: Vec::new(),
        }
    }
}

impl FrameSource for Scripted {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> FramelabResult<()> {
        self.log.borrow_mut().events.push(format!("open {}", self.name));
        match &self.open_error {
            Some(e) => Err(FramelabError::acquisition(e.clone())),
            None => Ok(()),
        }
    }

    fn read(&mut self) -> FramelabResult<Option<PixelBuffer>> {
        if self.reads.is_empty() {
            return Ok(None);
        }
        self.reads.remove(0)
    }

    fn close(&mut self) {
        self.log.borrow_mut().events.push(format!("close {}", self.name));
    }
}

fn frame() -> PixelBuffer {
    PixelBuffer::filled(Dimensions::new(2, 2).unwrap(), [1, 2, 3, 255]).unwrap()
}

#[test]
fn switching_releases_previous_before_opening_next() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut slot = AcquisitionSlot::new(CancelToken::new());

    slot.install(Box::new(Scripted::new("cam-a", &log)));
    slot.open().unwrap();
    slot.install(Box::new(Scripted::new("cam-b", &log)));
    slot.open().unwrap();

    let events = log.borrow().events.clone();
    let close_a = events.iter().position(|e| e == "close cam-a").unwrap();
    let open_b = events.iter().position(|e| e == "open cam-b").unwrap();
    assert!(close_a < open_b, "{events:?}");
    assert_eq!(slot.source_name(), Some("cam-b"));
}

#[test]
fn not_ready_reads_are_skipped_ticks() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut src = Scripted::new("file", &log);
    src.reads = vec![Ok(None), Ok(Some(frame()))];

    let mut slot = AcquisitionSlot::new(CancelToken::new());
    assert!(slot.acquire().is_none());
    slot.install(Box::new(src));
    assert!(slot.acquire().is_none(), "closed source must not be read");
    slot.open().unwrap();
    assert!(slot.acquire().is_none());
    assert_eq!(slot.acquire(), Some(frame()));
    assert_eq!(slot.state(), &AcquisitionState::Open);
}

#[test]
fn open_failure_is_reported_once_and_stays_failed() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut src = Scripted::new("camera", &log);
    src.open_error = Some("permission denied".to_string());

    let mut slot = AcquisitionSlot::new(CancelToken::new());
    slot.install(Box::new(src));
    assert!(slot.open().is_err());

    let notice = slot.take_failure_notice().unwrap();
    assert!(notice.contains("permission denied"));
    assert!(slot.take_failure_notice().is_none());

    for _ in 0..3 {
        assert!(slot.acquire().is_none());
    }
    assert!(matches!(slot.state(), AcquisitionState::Failed { .. }));
    let opens = log
        .borrow()
        .events
        .iter()
        .filter(|e| e.starts_with("open"))
        .count();
    assert_eq!(opens, 1, "no retry without explicit reopen");
}

#[test]
fn read_failure_closes_source_and_reopen_recovers() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut src = Scripted::new("decoder", &log);
    src.reads = vec![
        Err(FramelabError::acquisition("decoder lost")),
        Ok(Some(frame())),
    ];

    let mut slot = AcquisitionSlot::new(CancelToken::new());
    slot.install(Box::new(src));
    slot.open().unwrap();
    assert!(slot.acquire().is_none());
    assert!(slot.take_failure_notice().is_some());
    assert!(slot.acquire().is_none());

    slot.reopen().unwrap();
    assert_eq!(slot.acquire(), Some(frame()));
}

#[test]
fn dropping_the_slot_releases_the_source() {
    let log = Rc::new(RefCell::new(Log::default()));
    {
        let mut slot = AcquisitionSlot::new(CancelToken::new());
        slot.install(Box::new(Scripted::new("cam", &log)));
        slot.open().unwrap();
    }
    assert_eq!(log.borrow().events.last().map(String::as_str), Some("close cam"));
}
