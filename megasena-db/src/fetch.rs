use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::import::{ImportResult, parse_csv_text};
use crate::store::DrawSet;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug)]
pub enum FetchOutcome {
    Loaded { draws: DrawSet, report: ImportResult },
    TimedOut,
    Failed(String),
}

/// Download em andamento numa thread dedicada.
///
/// O worker só entrega um `DrawSet` completo, uma única vez, pelo canal.
pub struct FetchHandle {
    rx: Receiver<FetchOutcome>,
    worker: Option<JoinHandle<()>>,
}

impl FetchHandle {
    /// Não bloqueia. `None` enquanto o download não terminou.
    pub fn poll(&mut self) -> Option<FetchOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => {
                self.join();
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.join();
                Some(FetchOutcome::Failed("worker de download encerrado sem resultado".into()))
            }
        }
    }

    pub fn wait(mut self) -> FetchOutcome {
        let outcome = self
            .rx
            .recv()
            .unwrap_or_else(|_| FetchOutcome::Failed("worker de download encerrado sem resultado".into()));
        self.join();
        outcome
    }

    fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("A thread de download terminou em pânico");
            }
        }
    }
}

pub fn spawn_fetch(url: String, timeout: Duration) -> FetchHandle {
    let (tx, rx) = mpsc::channel();
    let worker = thread::spawn(move || {
        let outcome = download(&url, timeout);
        // O receptor pode ter sido descartado; nada a fazer nesse caso
        let _ = tx.send(outcome);
    });
    FetchHandle { rx, worker: Some(worker) }
}

fn download(url: &str, timeout: Duration) -> FetchOutcome {
    debug!("Baixando resultados de {} (timeout {:?})", url, timeout);

    let client = match reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
    {
        Ok(client) => client,
        Err(e) => return FetchOutcome::Failed(e.to_string()),
    };

    let body = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text());

    let body = match body {
        Ok(body) => body,
        Err(e) if e.is_timeout() => {
            warn!("Tempo esgotado ao baixar {}", url);
            return FetchOutcome::TimedOut;
        }
        Err(e) => return FetchOutcome::Failed(e.to_string()),
    };

    match parse_csv_text(&body) {
        Ok((draws, report)) => {
            info!("{} sorteios recebidos de {}", draws.len(), url);
            FetchOutcome::Loaded { draws, report }
        }
        Err(e) => FetchOutcome::Failed(format!("{e:#}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    fn serve_once(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let mut request = Vec::new();
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{}/resultados.csv", addr)
    }

    #[test]
    fn test_fetch_loaded() {
        let url = serve_once(
            "Concurso;Data do Sorteio;Bola1;Bola2;Bola3;Bola4;Bola5;Bola6\n1;03/01/2024;1;2;3;4;5;6\n",
        );
        match spawn_fetch(url, Duration::from_secs(5)).wait() {
            FetchOutcome::Loaded { draws, report } => {
                assert_eq!(draws.len(), 1);
                assert_eq!(report.imported, 1);
            }
            other => panic!("esperado Loaded, obtido {:?}", other),
        }
    }

    #[test]
    fn test_fetch_timeout() {
        // Aceita a conexão no backlog mas nunca responde
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        let outcome = spawn_fetch(url, Duration::from_millis(300)).wait();
        assert!(matches!(outcome, FetchOutcome::TimedOut), "obtido {:?}", outcome);
        drop(listener);
    }

    #[test]
    fn test_fetch_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let outcome = spawn_fetch(format!("http://{}/", addr), Duration::from_secs(2)).wait();
        assert!(matches!(outcome, FetchOutcome::Failed(_)), "obtido {:?}", outcome);
    }

    #[test]
    fn test_fetch_unparseable_body() {
        let url = serve_once("isto não é uma planilha\n");
        let outcome = spawn_fetch(url, Duration::from_secs(5)).wait();
        assert!(matches!(outcome, FetchOutcome::Failed(_)), "obtido {:?}", outcome);
    }

    #[test]
    fn test_poll_eventually_returns() {
        let url = serve_once(
            "Concurso;Data do Sorteio;Bola1;Bola2;Bola3;Bola4;Bola5;Bola6\n1;03/01/2024;1;2;3;4;5;6\n",
        );
        let mut handle = spawn_fetch(url, Duration::from_secs(5));
        let outcome = loop {
            if let Some(outcome) = handle.poll() {
                break outcome;
            }
            thread::sleep(Duration::from_millis(10));
        };
        assert!(matches!(outcome, FetchOutcome::Loaded { .. }));
    }
}
