//! Developer CLI that posts SNS-shaped deliveries to a running receiver.

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::json;
use uuid::Uuid;

use sns_confirm::http::SNS_MESSAGE_ID_HEADER;
use sns_confirm::sns::{SnsMessageType, MESSAGE_TYPE_HEADER};

#[derive(Parser)]
#[command(name = "sns-cli")]
#[command(about = "Send simulated SNS deliveries to an sns-receiver", long_about = None)]
struct Cli {
    /// Receiver endpoint URL.
    #[arg(short, long, default_value = "http://localhost:8080/sns")]
    url: String,

    /// Topic ARN placed in the message.
    #[arg(short, long, default_value = "arn:aws:sns:us-west-2:123456789012:MyTopic")]
    topic_arn: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a SubscriptionConfirmation pointing at the given SubscribeURL
    Confirm {
        #[arg(long)]
        subscribe_url: String,
    },
    /// Send a Notification carrying the given message
    Notify {
        #[arg(short, long)]
        message: String,

        #[arg(short, long)]
        subject: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let message_id = Uuid::new_v4().to_string();

    let (message_type, body) = match cli.command {
        Commands::Confirm { subscribe_url } => (
            SnsMessageType::SubscriptionConfirmation,
            json!({
                "Type": "SubscriptionConfirmation",
                "MessageId": message_id,
                "TopicArn": cli.topic_arn,
                "Message": format!("You have chosen to subscribe to the topic {}.", cli.topic_arn),
                "SubscribeURL": subscribe_url,
            }),
        ),
        Commands::Notify { message, subject } => (
            SnsMessageType::Notification,
            json!({
                "Type": "Notification",
                "MessageId": message_id,
                "TopicArn": cli.topic_arn,
                "Subject": subject,
                "Message": message,
            }),
        ),
    };

    // SNS labels its JSON bodies as plain text.
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=UTF-8"),
    );
    headers.insert(
        MESSAGE_TYPE_HEADER,
        HeaderValue::from_str(message_type.as_str())?,
    );
    headers.insert(SNS_MESSAGE_ID_HEADER, HeaderValue::from_str(&message_id)?);

    let res = client
        .post(&cli.url)
        .headers(headers)
        .body(serde_json::to_string(&body)?)
        .send()
        .await?;

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if status.is_success() {
        println!("{} {}", status, text);
    } else {
        eprintln!("Error: receiver returned status {}", status);
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(json) => eprintln!("{}", serde_json::to_string_pretty(&json)?),
            Err(_) => eprintln!("Response: {}", text),
        }
    }
    Ok(())
}
