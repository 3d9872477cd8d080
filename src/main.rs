//! quillmate - terminal front end for the writing assistant.
//!
//! Plain lines are sent to the model; slash commands drive the
//! offline helpers.

use std::io::Write;

use log::{debug, error, info};
use tokio::io::{AsyncBufReadExt, BufReader};

use quillmate::enhance;
use quillmate::suggestions::{self, Section, SectionContent, Sidebar};
use quillmate::{ConversationController, GroqClient, GroqConfig};

const HELP: &str = "\
Type text to ask the assistant. Commands:
  /enhance <text>     rewrite text offline
  /tips [section]     toggle a sidebar section (suggestions, grammar, tone, synonyms)
  /synonyms <word>    look up synonyms
  /clear              clear the last answer or error
  /quit               exit";

enum Command<'a>
{   Ask(&'a str)
  , Enhance(&'a str)
  , Tips(Option<&'a str>)
  , Synonyms(&'a str)
  , Clear
  , Help
  , Quit
  , Skip
}

impl<'a> Command<'a>
{   fn parse(line: &'a str) -> Self
    {   let line = line.trim();
        if line.is_empty()
        {   return Command::Skip;
        }
        let Some(rest) = line.strip_prefix('/')
        else
        {   return Command::Ask(line);
        };
        let (name, arg) = match rest.split_once(char::is_whitespace)
        {   Some((name, arg)) => (name, arg.trim())
          , None => (rest, "")
        };
        match name
        {   "enhance" => Command::Enhance(arg)
          , "tips" => Command::Tips(Some(arg).filter(|a| !a.is_empty()))
          , "synonyms" => Command::Synonyms(arg)
          , "clear" => Command::Clear
          , "quit" | "exit" => Command::Quit
          , _ => Command::Help
        }
    }
}

fn load_config() -> Result<GroqConfig, quillmate::Error>
{   match std::env::var("QUILLMATE_CONFIG")
    {   Ok(path) => GroqConfig::load(path)
      , Err(_) => Ok(GroqConfig::from_env())
    }
}

fn print_content(section: Section, content: SectionContent)
{   println!("== {} ==", section);
    match content
    {   SectionContent::Tips(tips) => {
          for tip in tips
          {   println!("  - {}", tip);
          }
        }
      , SectionContent::Synonyms(groups) => {
          for group in groups
          {   println!("  {}: {}", group.word, group.suggestions.join(", "));
          }
        }
    }
}

fn prompt()
{   print!("> ");
    if let Err(e) = std::io::stdout().flush()
    {   debug!("Failed to flush stdout: {}", e);
    }
}

#[tokio::main]
async fn main()
{   env_logger::init();

    let config = match load_config()
    {   Ok(config) => config
      , Err(e) => {
          error!("Failed to load configuration: {}", e);
          eprintln!("error: {}", e);
          std::process::exit(1);
        }
    };
    if config.api_key().is_none()
    {   info!("No Groq API key configured; requests will fail");
    }

    let controller = ConversationController::new(GroqClient::new(config));

    let mut updates = controller.subscribe();
    tokio::spawn(async move {
      while updates.changed().await.is_ok()
      {   let state = updates.borrow_and_update().clone();
          debug!("State: {:?}", state);
      }
    });

    let mut sidebar = Sidebar::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", HELP);
    prompt();
    while let Ok(Some(line)) = lines.next_line().await
    {   match Command::parse(&line)
        {   Command::Ask(text) => {
              println!("Sending...");
              controller.send_message(text).await;
              let state = controller.snapshot();
              if let Some(err) = state.error
              {   println!("Error: {}", err);
              } else if let Some(response) = state.response
              {   println!("{}", response);
              } else
              {   println!("(no response)");
              }
            }
          , Command::Enhance(text) => {
              println!("AI is enhancing your text...");
              println!("{}", enhance::enhance(text).await);
            }
          , Command::Tips(None) => {
              for section in sidebar.open_sections()
              {   print_content(section, section.content());
              }
            }
          , Command::Tips(Some(name)) => match name.parse::<Section>()
            {   Ok(section) => {
                  if sidebar.toggle(section)
                  {   let content = suggestions::load_section(section).await;
                      print_content(section, content);
                  } else
                  {   println!("{} collapsed", section);
                  }
                }
              , Err(e) => println!("{}", e)
            }
          , Command::Synonyms(word) => match suggestions::synonyms_for(word)
            {   Some(group) => {
                  println!("{}: {}", group.word, group.suggestions.join(", "));
                }
              , None => println!("No synonyms for '{}'", word)
            }
          , Command::Clear => controller.reset()
          , Command::Help => println!("{}", HELP)
          , Command::Quit => break
          , Command::Skip => {}
        }
        prompt();
    }
    info!("quillmate exiting");
}
