use engine::{text_extent, DrawList, Rect, Rgba, Vec2};

const BIG_SCALE: u32 = 16;
const NORMAL_SCALE: u32 = 6;
const HIT_PADDING: f32 = 12.0;

const TEXT_COLOR: Rgba = [255, 255, 255, 255];
const HOVER_COLOR: Rgba = [220, 40, 40, 255];

const RESTART_OFFSET_Y: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ButtonAction {
    Play,
    Exit,
    PlayAgain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElementKind {
    Field { big: bool },
    Button { action: ButtonAction, hovered: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct UiElement {
    text: &'static str,
    center: Vec2,
    z: i32,
    kind: ElementKind,
}

impl UiElement {
    fn field(text: &'static str, center: Vec2, big: bool) -> Self {
        Self {
            text,
            center,
            z: 0,
            kind: ElementKind::Field { big },
        }
    }

    fn button(text: &'static str, center: Vec2, z: i32, action: ButtonAction) -> Self {
        Self {
            text,
            center,
            z,
            kind: ElementKind::Button {
                action,
                hovered: false,
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn text(&self) -> &'static str {
        self.text
    }

    #[cfg(test)]
    pub(crate) fn kind(&self) -> ElementKind {
        self.kind
    }

    fn scale(&self) -> u32 {
        match self.kind {
            ElementKind::Field { big: true } => BIG_SCALE,
            _ => NORMAL_SCALE,
        }
    }

    pub(crate) fn rect(&self) -> Rect {
        let (width, height) = text_extent(self.text, self.scale());
        Rect::from_center(
            self.center,
            width as f32 + HIT_PADDING * 2.0,
            height as f32 + HIT_PADDING * 2.0,
        )
    }

    fn color(&self) -> Rgba {
        match self.kind {
            ElementKind::Button { hovered: true, .. } => HOVER_COLOR,
            _ => TEXT_COLOR,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct UiChrome {
    elements: Vec<UiElement>,
    center: Vec2,
}

impl UiChrome {
    pub(crate) fn menu(center: Vec2) -> Self {
        Self {
            elements: vec![
                UiElement::field("MISSIONARIES AND", center.offset(0.0, -210.0), true),
                UiElement::field("CANNIBALS", center.offset(0.0, -100.0), true),
                UiElement::button("PLAY", center.offset(0.0, 70.0), 1, ButtonAction::Play),
                UiElement::button("EXIT", center.offset(0.0, 180.0), 1, ButtonAction::Exit),
            ],
            center,
        }
    }

    pub(crate) fn board(center: Vec2) -> Self {
        Self {
            elements: Vec::new(),
            center,
        }
    }

    #[cfg(test)]
    pub(crate) fn elements(&self) -> &[UiElement] {
        &self.elements
    }

    pub(crate) fn on_win(&mut self) {
        self.elements
            .push(UiElement::field("YOU WON", self.center, true));
    }

    pub(crate) fn on_loss(&mut self) {
        self.elements.clear();
        self.elements
            .push(UiElement::field("YOU LOST", self.center, true));
    }

    pub(crate) fn on_restart_offered(&mut self) {
        let offered = self.elements.iter().any(|element| {
            matches!(
                element.kind,
                ElementKind::Button {
                    action: ButtonAction::PlayAgain,
                    ..
                }
            )
        });
        if !offered {
            self.elements.push(UiElement::button(
                "AGAIN?",
                self.center.offset(0.0, RESTART_OFFSET_Y),
                1,
                ButtonAction::PlayAgain,
            ));
        }
    }

    fn button_index_at(&self, point: Vec2) -> Option<usize> {
        let mut best: Option<(usize, i32)> = None;
        for (index, element) in self.elements.iter().enumerate() {
            if !matches!(element.kind, ElementKind::Button { .. }) {
                continue;
            }
            if !element.rect().contains(point) {
                continue;
            }
            if best.map_or(true, |(_, z)| element.z > z) {
                best = Some((index, element.z));
            }
        }
        best.map(|(index, _)| index)
    }

    pub(crate) fn button_at(&self, point: Vec2) -> Option<ButtonAction> {
        let index = self.button_index_at(point)?;
        match self.elements[index].kind {
            ElementKind::Button { action, .. } => Some(action),
            ElementKind::Field { .. } => None,
        }
    }

    pub(crate) fn apply_hover(&mut self, point: Option<Vec2>) {
        for element in &mut self.elements {
            if let ElementKind::Button { hovered, .. } = &mut element.kind {
                *hovered = false;
            }
        }
        let Some(index) = point.and_then(|point| self.button_index_at(point)) else {
            return;
        };
        if let ElementKind::Button { hovered, .. } = &mut self.elements[index].kind {
            *hovered = true;
        }
    }

    pub(crate) fn draw(&self, draw_list: &mut DrawList) {
        for element in &self.elements {
            draw_list.text_centered(element.text, element.center, element.scale(), element.color());
        }
    }
}
