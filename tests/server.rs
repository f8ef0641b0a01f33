//! End-to-end tests against a real server bound on an ephemeral port.

use std::net::SocketAddr;
use std::time::Duration;

use hash_quiz::client::{ConsoleFrontend, Outcome, drive};
use hash_quiz::config::{Endpoint, ServerConfig};
use hash_quiz::server::QuizServer;
use hash_quiz::{QuizBank, QuizItem};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::task::JoinHandle;
use tokio::time::timeout;

const STEP: Duration = Duration::from_secs(5);

fn sample_bank() -> QuizBank {
    QuizBank::new(vec![
        QuizItem::new("2+2", "4"),
        QuizItem::new("Capital of France", "Paris"),
    ])
}

fn local_config() -> ServerConfig {
    ServerConfig::new(Endpoint {
        host: "127.0.0.1".to_string(),
        port: 0,
    })
}

async fn start(config: ServerConfig, bank: QuizBank) -> (SocketAddr, QuizServer) {
    let server = QuizServer::bind(config, bank).await.expect("bind");
    let addr = server.local_addr().expect("local addr");
    (addr, server)
}

async fn spawn_server(config: ServerConfig, bank: QuizBank) -> (SocketAddr, JoinHandle<()>) {
    let (addr, server) = start(config, bank).await;
    (addr, tokio::spawn(server.run()))
}

struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect");
        let (reader, writer) = stream.into_split();
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("send");
    }

    /// Next line from the server, or `None` once it has closed the connection.
    async fn recv(&mut self) -> Option<String> {
        match timeout(STEP, self.lines.next_line()).await.expect("timed out") {
            Ok(line) => line,
            Err(_) => None,
        }
    }

    async fn expect(&mut self, expected: &str) {
        assert_eq!(self.recv().await.as_deref(), Some(expected));
    }
}

async fn wait_stopped(server: JoinHandle<()>) {
    timeout(STEP, server)
        .await
        .expect("server did not stop")
        .expect("server task panicked");
}

#[tokio::test]
async fn test_two_question_scenario() {
    let (addr, _server) = spawn_server(local_config(), sample_bank()).await;
    let mut client = TestClient::connect(addr).await;

    client.expect("QUESTION#1#2+2").await;
    client.send("ANSWER#1#4").await;
    client.expect("RESULT#1#CORRECT").await;
    client.expect("QUESTION#2#Capital of France").await;
    client.send("ANSWER#2#london").await;
    client.expect("RESULT#2#INCORRECT").await;
    client.expect("SCORE#1").await;
    assert_eq!(client.recv().await, None);
}

#[tokio::test]
async fn test_quit_after_score_keeps_server_running() {
    let (addr, server) = spawn_server(local_config(), sample_bank()).await;

    let mut first = TestClient::connect(addr).await;
    first.expect("QUESTION#1#2+2").await;
    first.send("ANSWER#1# 4 ").await;
    first.expect("RESULT#1#CORRECT").await;
    first.expect("QUESTION#2#Capital of France").await;
    first.send("ANSWER#2# PARIS ").await;
    first.expect("RESULT#2#CORRECT").await;
    first.expect("SCORE#2").await;
    first.send("QUIT").await;
    assert_eq!(first.recv().await, None);

    let mut second = TestClient::connect(addr).await;
    second.expect("QUESTION#1#2+2").await;
    assert!(!server.is_finished());
}

#[tokio::test]
async fn test_every_answer_gets_one_result_and_a_single_score() {
    for size in 0..4 {
        let bank: Vec<_> = (1..=size)
            .map(|i| QuizItem::new(format!("q{i}"), format!("a{i}")))
            .collect();
        let (addr, _server) = spawn_server(local_config(), QuizBank::new(bank)).await;
        let mut client = TestClient::connect(addr).await;

        let mut results = 0;
        let mut expected_score = 0;
        loop {
            let line = client.recv().await.expect("server closed before score");
            if let Some(rest) = line.strip_prefix("QUESTION#") {
                let number: usize = rest.split('#').next().unwrap().parse().unwrap();
                // Answer the even questions correctly.
                let answer = if number % 2 == 0 {
                    expected_score += 1;
                    format!("A{number}")
                } else {
                    "wrong".to_string()
                };
                client.send(&format!("ANSWER#{number}#{answer}")).await;
            } else if line.starts_with("RESULT#") {
                results += 1;
            } else {
                assert_eq!(line, format!("SCORE#{expected_score}"));
                break;
            }
        }

        assert_eq!(results, size);
        assert_eq!(client.recv().await, None);
    }
}

#[tokio::test]
async fn test_malformed_and_out_of_turn_messages_reprompt() {
    let (addr, _server) = spawn_server(local_config(), sample_bank()).await;
    let mut client = TestClient::connect(addr).await;

    client.expect("QUESTION#1#2+2").await;

    client.send("HELLO").await;
    client.expect("ERROR#Unknown message type: HELLO").await;
    client.expect("QUESTION#1#2+2").await;

    client.send("ANSWER#2#Paris").await;
    client.expect("ERROR#Unexpected message.").await;
    client.expect("QUESTION#1#2+2").await;

    client.send("SCORE#5").await;
    client.expect("ERROR#Unexpected message.").await;
    client.expect("QUESTION#1#2+2").await;

    client.send("ANSWER#1#4").await;
    client.expect("RESULT#1#CORRECT").await;
    client.expect("QUESTION#2#Capital of France").await;
}

#[tokio::test]
async fn test_non_utf8_answer_reprompts() {
    let (addr, _server) = spawn_server(local_config(), sample_bank()).await;
    let mut client = TestClient::connect(addr).await;

    client.expect("QUESTION#1#2+2").await;
    client.writer.write_all(b"ANSWER#1#\xff\xfe\n").await.unwrap();
    client.expect("ERROR#Message is not valid UTF-8.").await;
    client.expect("QUESTION#1#2+2").await;

    client.send("ANSWER#1#4").await;
    client.expect("RESULT#1#CORRECT").await;
    client.expect("QUESTION#2#Capital of France").await;
    client.send("ANSWER#2#Paris").await;
    client.expect("RESULT#2#CORRECT").await;
    client.expect("SCORE#2").await;
    assert_eq!(client.recv().await, None);
}

#[tokio::test]
async fn test_quit_stops_accepting_new_clients() {
    let (addr, server) = spawn_server(local_config(), sample_bank()).await;
    let mut client = TestClient::connect(addr).await;

    client.expect("QUESTION#1#2+2").await;
    client.send("QUIT").await;
    assert_eq!(client.recv().await, None);

    wait_stopped(server).await;
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_quit_does_not_disturb_other_sessions() {
    let (addr, server) = spawn_server(local_config(), sample_bank()).await;

    let mut quitter = TestClient::connect(addr).await;
    let mut player = TestClient::connect(addr).await;
    quitter.expect("QUESTION#1#2+2").await;
    player.expect("QUESTION#1#2+2").await;

    player.send("ANSWER#1#5").await;
    player.expect("RESULT#1#INCORRECT").await;
    player.expect("QUESTION#2#Capital of France").await;

    quitter.send("ANSWER#1#4").await;
    quitter.expect("RESULT#1#CORRECT").await;
    quitter.expect("QUESTION#2#Capital of France").await;
    quitter.send("QUIT").await;
    assert_eq!(quitter.recv().await, None);

    // The accept loop is gone but the running session keeps the server alive.
    assert!(!server.is_finished());

    player.send("ANSWER#2#paris").await;
    player.expect("RESULT#2#CORRECT").await;
    player.expect("SCORE#1").await;
    assert_eq!(player.recv().await, None);

    wait_stopped(server).await;
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_keep_running_ignores_quit() {
    let config = local_config().with_shutdown_on_quit(false);
    let (addr, server) = start(config, sample_bank()).await;
    let shutdown = server.shutdown_token();
    let server = tokio::spawn(server.run());

    let mut quitter = TestClient::connect(addr).await;
    quitter.expect("QUESTION#1#2+2").await;
    quitter.send("QUIT").await;
    assert_eq!(quitter.recv().await, None);

    let mut next = TestClient::connect(addr).await;
    next.expect("QUESTION#1#2+2").await;
    drop(next);

    shutdown.cancel();
    wait_stopped(server).await;
}

#[tokio::test]
async fn test_empty_bank_scores_zero() {
    let (addr, _server) = spawn_server(local_config(), QuizBank::default()).await;
    let mut client = TestClient::connect(addr).await;

    client.expect("SCORE#0").await;
    assert_eq!(client.recv().await, None);
}

#[tokio::test]
async fn test_console_client_plays_full_quiz() {
    let (addr, _server) = spawn_server(local_config(), sample_bank()).await;
    let stream = TcpStream::connect(addr).await.unwrap();

    let mut frontend = ConsoleFrontend::new(&b"4\nlondon\n"[..], Vec::new());
    let outcome = timeout(STEP, drive(stream, &mut frontend))
        .await
        .expect("timed out")
        .unwrap();

    assert_eq!(outcome, Outcome::Finished { score: 1 });
    let output = String::from_utf8(frontend.into_output()).unwrap();
    assert_eq!(
        output,
        "2+2\nYour answer: CORRECT\nCapital of France\nYour answer: INCORRECT\nFinal Score: 1\n"
    );
}

#[tokio::test]
async fn test_bind_failure_is_reported() {
    let (addr, _server) = spawn_server(local_config(), sample_bank()).await;
    let taken = ServerConfig::new(Endpoint {
        host: "127.0.0.1".to_string(),
        port: addr.port(),
    });

    let err = QuizServer::bind(taken, sample_bank()).await.err().expect("port in use");
    assert!(err.to_string().starts_with("failed to bind 127.0.0.1:"));
}
