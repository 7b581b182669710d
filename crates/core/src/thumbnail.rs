use tracing::debug;

use crate::{
    render::{FrameLoad, View},
    transport::{HttpReply, HttpTransport},
};

/// Check whether one thumbnail URL serves an image.
pub async fn probe_frame(transport: &dyn HttpTransport, url: &str) -> FrameLoad {
    match transport.fetch(url).await {
        Ok(reply) if is_image(&reply) => FrameLoad::Loaded,
        Ok(reply) => {
            debug!(url, status = reply.status, content_type = ?reply.content_type, "thumbnail did not load");
            FrameLoad::Failed
        }
        Err(e) => {
            debug!(url, error = %e, "thumbnail fetch failed");
            FrameLoad::Failed
        }
    }
}

fn is_image(reply: &HttpReply) -> bool {
    if !reply.is_success() || reply.body.is_empty() {
        return false;
    }
    match reply.content_type.as_deref() {
        Some(content_type) => content_type.trim_start().starts_with("image/"),
        None => true,
    }
}

/// Probe every tile of `view` one at a time and record each outcome on its own tile.
pub async fn probe_frames(transport: &dyn HttpTransport, view: &mut View) {
    let urls: Vec<String> = view.frame_urls().into_iter().map(str::to_string).collect();
    for (index, url) in urls.iter().enumerate() {
        let load = probe_frame(transport, url).await;
        view.set_frame_load(index, load);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_replies() {
        let png = HttpReply::new(200, vec![0x89, b'P', b'N', b'G']).with_content_type("image/png");
        assert!(is_image(&png));

        let untyped = HttpReply::new(200, vec![1, 2, 3]);
        assert!(is_image(&untyped));
    }

    #[test]
    fn non_image_replies() {
        let html = HttpReply::new(200, "<html>").with_content_type("text/html");
        assert!(!is_image(&html));

        let missing = HttpReply::new(404, "").with_content_type("image/png");
        assert!(!is_image(&missing));

        let empty = HttpReply::new(200, Vec::new()).with_content_type("image/jpeg");
        assert!(!is_image(&empty));
    }
}
