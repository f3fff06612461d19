use std::sync::mpsc;
use std::thread;

use tracing::{debug, info, warn};

use crate::io::api::NotesApi;
use crate::ops::request::{Reply, Request};

/// Runs backend requests off the UI thread, one at a time and in the order
/// they were submitted.
pub struct Worker {
    tx: Option<mpsc::Sender<Request>>,
    rx: mpsc::Receiver<Reply>,
    handle: Option<thread::JoinHandle<()>>,
    in_flight: usize,
}

impl Worker {
    /// Start the worker thread. It owns `api` until the worker is dropped.
    pub fn spawn(mut api: Box<dyn NotesApi + Send>) -> std::io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<Request>();
        let (reply_tx, reply_rx) = mpsc::channel::<Reply>();

        let handle = thread::Builder::new()
            .name("tn-backend".into())
            .spawn(move || {
                for request in request_rx {
                    if request.is_mutation() {
                        info!(request = %request.describe(), "running");
                    } else {
                        debug!(request = %request.describe(), "running");
                    }
                    let reply = request.run(api.as_mut());
                    if reply_tx.send(reply).is_err() {
                        break;
                    }
                }
                debug!("backend worker stopped");
            })?;

        Ok(Worker {
            tx: Some(request_tx),
            rx: reply_rx,
            handle: Some(handle),
            in_flight: 0,
        })
    }

    pub fn submit(&mut self, requests: Vec<Request>) {
        let Some(tx) = &self.tx else {
            return;
        };
        for request in requests {
            if tx.send(request).is_err() {
                warn!("backend worker is gone");
                return;
            }
            self.in_flight += 1;
        }
    }

    /// Non-blocking poll for finished requests.
    pub fn poll(&mut self) -> Vec<Reply> {
        let mut replies = Vec::new();
        while let Ok(reply) = self.rx.try_recv() {
            replies.push(reply);
        }
        self.in_flight = self.in_flight.saturating_sub(replies.len());
        replies
    }

    /// Requests submitted but not yet answered.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // closing the channel ends the thread's loop
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::memory::MemoryApi;
    use crate::model::NoteId;
    use crate::ops::request::Response;
    use std::time::{Duration, Instant};

    fn wait_for(worker: &mut Worker, count: usize) -> Vec<Reply> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut replies = Vec::new();
        while replies.len() < count && Instant::now() < deadline {
            replies.extend(worker.poll());
            thread::sleep(Duration::from_millis(5));
        }
        replies
    }

    #[test]
    fn replies_arrive_in_submission_order() {
        let mut worker = Worker::spawn(Box::new(MemoryApi::demo())).unwrap();
        worker.submit(vec![
            Request::DeleteNote(NoteId::from("1")),
            Request::ListTitles(vec![]),
        ]);
        assert_eq!(worker.in_flight(), 2);

        let replies = wait_for(&mut worker, 2);
        assert_eq!(replies.len(), 2);
        assert!(matches!(replies[0].result, Ok(Response::Deleted)));
        match &replies[1].result {
            Ok(Response::Titles(titles)) => assert_eq!(titles.len(), 3),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!worker.is_busy());
    }

    #[test]
    fn errors_come_back_as_replies() {
        let mut worker = Worker::spawn(Box::new(MemoryApi::new())).unwrap();
        worker.submit(vec![Request::GetNote(NoteId::from("9"))]);
        let replies = wait_for(&mut worker, 1);
        assert!(replies[0].result.is_err());
    }
}
