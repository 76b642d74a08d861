use crate::{
    assistant::{ChatMessage, ChatSession, Persona},
    commands::require_session,
    AppState,
};

const ENABLE_LOGS: bool = true;

use crate::log_info;

fn chat_for(state: &AppState, persona: Persona) -> &tokio::sync::Mutex<ChatSession> {
    match persona {
        Persona::Assistant => &state.assistant_chat,
        Persona::Chatbot => &state.chatbot_chat,
    }
}

/// Starts a fresh transcript, as entering the chat page does.
pub async fn open_chat(state: &AppState, persona: Persona) -> Result<Vec<ChatMessage>, String> {
    let user = require_session(state)?;
    let latency = state.config.get().chat_latency;
    let latency = match persona {
        Persona::Assistant => latency.assistant(),
        Persona::Chatbot => latency.chatbot(),
    };

    let session = ChatSession::new(persona, latency, user.display_name.as_deref());
    let messages = session.messages().to_vec();
    *chat_for(state, persona).lock().await = session;
    Ok(messages)
}

pub async fn get_chat(state: &AppState, persona: Persona) -> Result<ChatSession, String> {
    require_session(state)?;
    Ok(chat_for(state, persona).lock().await.clone())
}

/// Appends the message and, after the persona's latency, its reply. The
/// transcript stays readable while the reply is pending. If the chat is
/// reopened meanwhile, the reply is dropped and `None` returned.
pub async fn send_chat_message(
    state: &AppState,
    persona: Persona,
    text: String,
) -> Result<Option<ChatMessage>, String> {
    require_session(state)?;
    let chat = chat_for(state, persona);
    let metrics = state.store.snapshot().health_metrics;

    let (generation, latency) = {
        let mut session = chat.lock().await;
        if session.push_user(&text).is_none() {
            return Ok(None);
        }
        (session.generation(), session.latency())
    };

    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }

    let reply = persona.reply(&text, &metrics);
    let delivered = chat.lock().await.push_reply_for(generation, reply);
    if delivered.is_none() {
        log_info!("chat reopened before the reply arrived; dropping it");
    }
    Ok(delivered)
}
