use std::path::Path;

use clap::Subcommand;

use crate::domain::DomainError;

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a thread for a single topic
    Thread {
        topic: String,

        /// File holding a prompt template with a ${topic} placeholder
        #[arg(short, long)]
        template: Option<String>,

        /// Also extract a cover title and print an image prompt
        #[arg(long)]
        image: bool,
    },

    /// Print the cover image prompt for the given titles
    ImagePrompt {
        topic: String,

        #[arg(long)]
        title: String,

        #[arg(long)]
        subtitle: String,
    },

    /// Check that the chat completions endpoint answers
    Ping,

    /// Print the resolved environment and its configuration
    Config,

    /// Generate threads for every topic in a file, one topic per line
    Batch {
        topics_file: String,

        #[arg(short, long)]
        template: Option<String>,
    },
}

/// Read one topic per line, skipping blank lines.
pub async fn read_topics(path: impl AsRef<Path>) -> Result<Vec<String>, DomainError> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn read_topics_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "副业真相\n\n  remote work  \n\t\nAI tools").expect("write");

        let topics = read_topics(file.path()).await.expect("read");
        assert_eq!(topics, vec!["副业真相", "remote work", "AI tools"]);
    }

    #[tokio::test]
    async fn read_topics_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_topics(dir.path().join("missing.txt")).await.unwrap_err();
        assert!(matches!(err, DomainError::Io(_)));
    }
}
