#![allow(dead_code)]

use face_compare_core::{AppConfig, CapturedRun, CommandRunner, Error, Invocation};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Runner double that never spawns; records every invocation and replies with a canned run.
#[derive(Clone)]
pub struct RecordingRunner {
    pub calls: Arc<Mutex<Vec<Invocation>>>,
    reply: CapturedRun,
}

impl RecordingRunner {
    pub fn replying(exit_code: i32, output: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            reply: CapturedRun {
                exit_code: Some(exit_code),
                output: output.to_string(),
            },
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<CapturedRun, Error> {
        self.calls.lock().unwrap().push(invocation.clone());
        Ok(self.reply.clone())
    }
}

/// Config that runs `sh <script_dir>/compare_faces.sh` without an environment runner.
pub fn stub_config(upload_dir: &Path, script_dir: &Path, script_body: &str) -> AppConfig {
    fs::write(script_dir.join("compare_faces.sh"), script_body).unwrap();
    AppConfig {
        upload_dir: upload_dir.to_string_lossy().into_owned(),
        script_dir: script_dir.to_string_lossy().into_owned(),
        comparator_script: "compare_faces.sh".to_string(),
        script_interpreter: "sh".to_string(),
        env_runner: String::new(),
        ..AppConfig::default()
    }
}

pub fn write_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("fake image bytes for {}", name)).unwrap();
    path
}
