// 命令行入口
// 读取材料文件，调用本地 llama-server 生成题目并输出 JSON

use chuti::services::{LlamaClient, LlamaConfig, QuizEngine};
use chuti::utils;
use std::process;
use std::sync::Arc;

const USAGE: &str = "用法: chuti <材料文件> [题目数量] [题型] [难度]";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("错误: {}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let context_path = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("{}", USAGE))?;
    let num_questions: usize = match args.get(1) {
        Some(raw) => raw.parse()?,
        None => 5,
    };
    let question_type = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| "MultipleChoice".to_string());
    let difficulty = args.get(3).cloned().unwrap_or_else(|| "Medium".to_string());

    utils::setup_logging(std::env::var("CHUTI_VERBOSE").is_ok())?;

    let context = std::fs::read_to_string(context_path)?;

    let config = LlamaConfig {
        server_url: utils::server_url_from_env(),
        ..Default::default()
    };
    let client = Arc::new(LlamaClient::new(config)?);

    if !client.is_healthy().await {
        anyhow::bail!("llama-server 未就绪: {}", utils::server_url_from_env());
    }

    let engine = QuizEngine::new(client.clone(), client);
    let questions = engine
        .generate_questions(&context, num_questions, &question_type, &difficulty)
        .await?;

    println!("{}", serde_json::to_string_pretty(&questions)?);

    Ok(())
}
