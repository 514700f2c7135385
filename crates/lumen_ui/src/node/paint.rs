//! Kind-specific painting.

use lumen_shared::{Vec2, Vec4};

use super::{Node, NodeKind};
use crate::render::DrawList;

impl Node {
    /// Records this node's draw commands, clipped to its clip rect.
    ///
    /// Frames draw the background (texture tinted by the background color,
    /// or a plain fill) and then the border. Text draws at the content
    /// origin.
    pub fn paint(&self, list: &mut DrawList, scale: f32) {
        let p = &self.params;
        let rect = self.layout_box.rect();
        list.set_clip(self.clip);

        match &self.kind {
            NodeKind::Frame => {
                if p.background_texture.is_some() {
                    let tint = if p.background_color == Vec4::ZERO {
                        Vec4::WHITE
                    } else {
                        p.background_color
                    };
                    list.texture(rect, &p.background_texture, tint);
                } else if !p.background_color.is_transparent() {
                    list.fill_rect(rect, p.background_color);
                }

                let width = p.border_width * scale;
                if width > 0.0 && !p.border_color.is_transparent() {
                    list.stroke_rect(rect, p.border_color, width, p.border_inner);
                }
            }
            NodeKind::Text(content) => {
                if content.text.is_empty() || p.text_color.is_transparent() {
                    return;
                }
                let padding = self.layout_box.padding;
                let position = self.layout_box.position + Vec2::new(padding.left, padding.top);
                list.text(&content.text, position, &p.font, p.text_size * scale, p.text_color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use lumen_shared::Rect;

    use super::*;
    use crate::key::Key;
    use crate::layout::LayoutBox;
    use crate::node::TextContent;
    use crate::render::RenderCommand;
    use crate::values::{TextureInfo, TextureRef};

    fn placed(kind: NodeKind) -> Node {
        let mut node = Node::new(Key::named("p"), kind, None, 0);
        node.layout_box = LayoutBox {
            position: Vec2::new(10.0, 20.0),
            size: Vec2::new(100.0, 50.0),
            ..LayoutBox::default()
        };
        node.clip = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        node
    }

    #[test]
    fn test_frame_fill_then_border() {
        let mut node = placed(NodeKind::Frame);
        node.params.background_color = Vec4::rgb(10.0, 20.0, 30.0);
        node.params.border_color = Vec4::WHITE;
        node.params.border_width = 2.0;

        let mut list = DrawList::new();
        node.paint(&mut list, 1.5);
        let commands = list.commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], RenderCommand::SetClip(_)));
        assert!(matches!(commands[1], RenderCommand::FillRect { .. }));
        assert!(matches!(
            commands[2],
            RenderCommand::StrokeRect { width, inner: true, .. } if (width - 3.0).abs() < 1e-6
        ));
    }

    #[test]
    fn test_texture_tinted_white_without_color() {
        let mut node = placed(NodeKind::Frame);
        node.params.background_texture = TextureRef::new(TextureInfo {
            name: "panel".into(),
            size: Vec2::new(64.0, 64.0),
        });

        let mut list = DrawList::new();
        node.paint(&mut list, 1.0);
        assert!(matches!(
            &list.commands()[1],
            RenderCommand::Texture { tint, .. } if *tint == Vec4::WHITE
        ));
    }

    #[test]
    fn test_transparent_frame_draws_nothing() {
        let node = placed(NodeKind::Frame);
        let mut list = DrawList::new();
        node.paint(&mut list, 1.0);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_text_at_content_origin() {
        let mut node = placed(NodeKind::Text(TextContent { text: "Hi".into() }));
        node.layout_box.padding.left = 4.0;
        node.params.text_size = 10.0;

        let mut list = DrawList::new();
        node.paint(&mut list, 2.0);
        match &list.commands()[1] {
            RenderCommand::Text { text, position, size, .. } => {
                assert_eq!(text, "Hi");
                assert_eq!(*position, Vec2::new(14.0, 20.0));
                assert!((size - 20.0).abs() < 1e-6);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
