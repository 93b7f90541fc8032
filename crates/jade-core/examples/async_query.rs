use jade_core::{AsyncGptClient, LlmError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = AsyncGptClient::new(None)?;
    client.connect().await?;

    let questions = ["What is the capital of France?", "What is the capital of Japan?"];
    let (first, second) = tokio::join!(client.query(questions[0]), client.query(questions[1]));

    for (question, answer) in questions.iter().zip([first, second]) {
        match answer {
            Ok(text) => println!("{question}\n  {text}"),
            Err(LlmError::Status { status, .. }) => println!("{question}\n  API answered {status}"),
            Err(e) => println!("{question}\n  {e}"),
        }
    }

    client.close().await?;
    Ok(())
}
