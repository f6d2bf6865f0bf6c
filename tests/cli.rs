//! End-to-end tests for the `llm-cmd-helper` binary

use mockito::Server;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::process::{Command, Output};
use std::thread;
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_llm-cmd-helper");
const PATH: &str = "/v1/chat/completions";

/// A command with a clean environment and an empty config directory
fn helper(home: &TempDir) -> Command {
    let mut cmd = Command::new(BIN);
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("LLM_API_TOKEN")
        .env_remove("LLM_MODEL_NAME")
        .env_remove("LLM_API_URL")
        .env_remove("LLM_CMD_HELPER_PROMPT_PREFIX")
        .env_remove("LLM_CMD_HELPER_ENV_FILE")
        .env_remove("LLM_CMD_HELPER_LOG");
    cmd
}

/// Answer one request with `reply` verbatim and close the connection
fn serve_raw_once(reply: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let length = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        socket.write_all(reply.as_bytes()).unwrap();
        socket.flush().unwrap();
    });
    format!("http://{}{}", addr, PATH)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_missing_argument() {
    let home = TempDir::new().unwrap();
    let output = helper(&home).env("LLM_API_TOKEN", "sk-test").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("Usage:"));
}

#[test]
fn test_missing_token_makes_no_request() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let mock = server.mock("POST", PATH).expect(0).create();

    let output = helper(&home)
        .env("LLM_API_URL", format!("{}{}", server.url(), PATH))
        .arg("gti status")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("LLM_API_TOKEN"));
    mock.assert();
}

#[test]
fn test_prints_fixed_command() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let _mock = server
        .mock("POST", PATH)
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"```bash\\n\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"git status\\n```\"}}]}\n\n",
            "data: [DONE]\n\n",
        ))
        .create();

    let output = helper(&home)
        .env("LLM_API_TOKEN", "sk-test")
        .env("LLM_API_URL", format!("{}{}", server.url(), PATH))
        .arg("gti status")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "git status");
    assert!(stderr(&output).contains("Query to: o4-mini"));
}

#[test]
fn test_falls_back_to_original_command() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let _mock = server
        .mock("POST", PATH)
        .with_status(500)
        .with_body("internal error")
        .create();

    let output = helper(&home)
        .env("LLM_API_TOKEN", "sk-test")
        .env("LLM_MODEL_NAME", "gpt-4o-mini")
        .env("LLM_API_URL", format!("{}{}", server.url(), PATH))
        .arg("dokcer ps")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "dokcer ps");
    assert!(stderr(&output).contains("internal error"));
}

#[test]
fn test_reads_env_file() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let _mock = server
        .mock("POST", PATH)
        .match_header("authorization", "Bearer sk-from-file")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"content":"make build"}}]}"#)
        .create();

    let env_file = home.path().join("helper.env");
    std::fs::write(
        &env_file,
        format!("LLM_API_TOKEN=sk-from-file\nLLM_API_URL={}{}\n", server.url(), PATH),
    )
    .unwrap();

    let output = helper(&home)
        .env("LLM_CMD_HELPER_ENV_FILE", &env_file)
        .env("LLM_CMD_HELPER_PROMPT_PREFIX", "Fix: ")
        .arg("mkae build")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), " make build");
}

#[test]
fn test_stream_without_content_keeps_original_command() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(concat!(
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
            "data: [DONE]\n\n",
        ))
        .create();

    let output = helper(&home)
        .env("LLM_API_TOKEN", "sk-test")
        .env("LLM_API_URL", format!("{}{}", server.url(), PATH))
        .arg("gti log")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "gti log");
    assert!(stderr(&output).contains("without content"));
}

#[test]
fn test_cut_off_stream_keeps_original_command() {
    let home = TempDir::new().unwrap();
    let chunk = "data: {\"choices\":[{\"delta\":{\"content\":\"git \"}}]}\n\n";
    let url = serve_raw_once(format!(
        concat!(
            "HTTP/1.1 200 OK\r\n",
            "content-type: text/event-stream\r\n",
            "transfer-encoding: chunked\r\n\r\n",
            "{:x}\r\n{}\r\n",
        ),
        chunk.len(),
        chunk
    ));

    let output = helper(&home)
        .env("LLM_API_TOKEN", "sk-test")
        .env("LLM_API_URL", url)
        .arg("gti push")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "gti push");
    assert!(stderr(&output).contains("Streaming error"));
}

#[test]
fn test_missing_env_file_warns() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"content":"ls"}}]}"#)
        .create();

    let output = helper(&home)
        .env("LLM_CMD_HELPER_ENV_FILE", home.path().join("missing.env"))
        .env("LLM_API_TOKEN", "sk-test")
        .env("LLM_API_URL", format!("{}{}", server.url(), PATH))
        .arg("sl")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "ls");
    assert!(stderr(&output).contains("which was not found"));
}
