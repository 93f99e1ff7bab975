//! Circuit construction and validation.

use indexmap::IndexMap;

use crate::element::{Element, SineSpec};
use crate::error::{Error, Result};
use crate::model::{DeviceModel, ModelKind};
use crate::node::{Node, NodeId, canonical_name, is_ground_name};

/// A circuit: named nodes, elements in insertion order, and model cards.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Nodes keyed by canonical (lower-case) name. Ground is always present.
    nodes: IndexMap<String, Node>,
    /// Next available node ID.
    next_node_id: u32,
    title: Option<String>,
    elements: Vec<Element>,
    /// Models keyed by upper-case name.
    models: IndexMap<String, DeviceModel>,
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new() -> Self {
        let mut nodes = IndexMap::new();
        nodes.insert("0".to_string(), Node::ground());
        Self {
            nodes,
            next_node_id: 1, // 0 is reserved for ground
            title: None,
            elements: Vec::new(),
            models: IndexMap::new(),
        }
    }

    /// Create a new circuit with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        let mut circuit = Self::new();
        circuit.title = Some(title.into());
        circuit
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Get or declare the node with the given name.
    pub fn node(&mut self, name: &str) -> NodeId {
        if is_ground_name(name) {
            return NodeId::GROUND;
        }
        let key = canonical_name(name);
        if let Some(node) = self.nodes.get(&key) {
            return node.id;
        }
        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.insert(
            key,
            Node {
                id,
                name: name.trim().to_string(),
            },
        );
        id
    }

    /// Look up an already declared node.
    pub fn find_node(&self, name: &str) -> Result<NodeId> {
        self.nodes
            .get(&canonical_name(name))
            .map(|n| n.id)
            .ok_or_else(|| Error::NodeNotFound(name.to_string()))
    }

    /// Name of a node as written in the netlist.
    ///
    /// Unknown ids render as `?`.
    pub fn node_name(&self, id: NodeId) -> &str {
        self.nodes
            .values()
            .find(|n| n.id == id)
            .map(|n| n.name.as_str())
            .unwrap_or("?")
    }

    /// All nodes, ground first, then in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of nodes excluding ground.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Look up an element by card name (`QQ_LED1`, `Cfilter`), ignoring case.
    ///
    /// Card names are unique; user names alone are not (`RLOAD` and `CLOAD`).
    pub fn element(&self, card_name: &str) -> Option<&Element> {
        self.elements
            .iter()
            .find(|e| e.card_name().eq_ignore_ascii_case(card_name))
    }

    pub fn models(&self) -> impl Iterator<Item = &DeviceModel> {
        self.models.values()
    }

    /// Look up a model by name (case-insensitive).
    pub fn get_model(&self, name: &str) -> Option<&DeviceModel> {
        self.models.get(&name.to_ascii_uppercase())
    }

    /// Add an element, rejecting duplicate card names.
    pub fn add_element(&mut self, element: Element) -> Result<()> {
        let card_name = element.card_name();
        self.ensure_unused(&card_name)?;
        log::debug!("adding element {}", card_name);
        self.elements.push(element);
        Ok(())
    }

    /// Fails if a card with this name exists. Builders call this before
    /// declaring nodes so a rejected element leaves no nodes behind.
    fn ensure_unused(&self, card_name: &str) -> Result<()> {
        if self.element(card_name).is_some() {
            return Err(Error::DuplicateElement(card_name.to_string()));
        }
        Ok(())
    }

    /// Declare a `.model` card.
    pub fn model(&mut self, model: DeviceModel) -> Result<()> {
        let key = model.name.to_ascii_uppercase();
        if self.models.contains_key(&key) {
            return Err(Error::DuplicateModel(model.name));
        }
        for (param, value) in &model.params {
            if !value.is_finite() {
                return Err(Error::InvalidValue {
                    name: format!("{}.{}", model.name, param),
                    reason: "must be finite".to_string(),
                });
            }
        }
        log::debug!("adding model {} ({})", model.name, model.kind);
        self.models.insert(key, model);
        Ok(())
    }

    /// Add a sinusoidal voltage source between `pos` and `neg`.
    pub fn sinusoidal_voltage_source(
        &mut self,
        name: &str,
        pos: &str,
        neg: &str,
        sine: SineSpec,
    ) -> Result<()> {
        positive(name, "frequency", sine.frequency)?;
        for (what, value) in [
            ("offset", sine.offset),
            ("amplitude", sine.amplitude),
            ("delay", sine.delay),
            ("damping", sine.damping),
            ("phase", sine.phase),
        ] {
            if !value.is_finite() {
                return Err(invalid(name, what, "must be finite"));
            }
        }
        self.ensure_unused(&format!("V{}", name))?;
        let element = Element::SinVoltageSource {
            name: name.to_string(),
            pos: self.node(pos),
            neg: self.node(neg),
            sine,
        };
        self.add_element(element)
    }

    pub fn resistor(&mut self, name: &str, a: &str, b: &str, ohms: f64) -> Result<()> {
        positive(name, "resistance", ohms)?;
        self.ensure_unused(&format!("R{}", name))?;
        let element = Element::Resistor {
            name: name.to_string(),
            a: self.node(a),
            b: self.node(b),
            ohms,
        };
        self.add_element(element)
    }

    pub fn capacitor(&mut self, name: &str, a: &str, b: &str, farads: f64) -> Result<()> {
        positive(name, "capacitance", farads)?;
        self.ensure_unused(&format!("C{}", name))?;
        let element = Element::Capacitor {
            name: name.to_string(),
            a: self.node(a),
            b: self.node(b),
            farads,
        };
        self.add_element(element)
    }

    pub fn diode(&mut self, name: &str, anode: &str, cathode: &str, model: &str) -> Result<()> {
        self.ensure_unused(&format!("D{}", name))?;
        let element = Element::Diode {
            name: name.to_string(),
            anode: self.node(anode),
            cathode: self.node(cathode),
            model: model.to_string(),
        };
        self.add_element(element)
    }

    pub fn bjt(
        &mut self,
        name: &str,
        collector: &str,
        base: &str,
        emitter: &str,
        model: &str,
    ) -> Result<()> {
        self.ensure_unused(&format!("Q{}", name))?;
        let element = Element::Bjt {
            name: name.to_string(),
            collector: self.node(collector),
            base: self.node(base),
            emitter: self.node(emitter),
            model: model.to_string(),
        };
        self.add_element(element)
    }

    /// Distinct elements attached to each node, in node declaration order.
    ///
    /// An element with several terminals on one node is listed once.
    pub fn connections(&self) -> IndexMap<NodeId, Vec<&Element>> {
        let mut map: IndexMap<NodeId, Vec<&Element>> =
            self.nodes.values().map(|n| (n.id, Vec::new())).collect();
        for element in &self.elements {
            for (_, id) in element.terminals() {
                let attached = map.entry(id).or_default();
                if !attached.last().is_some_and(|e| std::ptr::eq(*e, element)) {
                    attached.push(element);
                }
            }
        }
        map
    }

    /// Check that the circuit is well-formed before handing it to the engine.
    ///
    /// - at least one element, and at least one element on ground;
    /// - every declared node joins two or more distinct elements;
    /// - every model reference resolves to a model of the matching kind.
    pub fn validate(&self) -> Result<()> {
        if self.elements.is_empty() {
            return Err(Error::InvalidCircuit("circuit has no elements".to_string()));
        }

        let connections = self.connections();
        for (id, attached) in &connections {
            match attached.as_slice() {
                [] if id.is_ground() => {
                    return Err(Error::InvalidCircuit(
                        "no element is connected to ground".to_string(),
                    ));
                }
                [] => {
                    return Err(Error::NodeNotFound(self.node_name(*id).to_string()));
                }
                [only] => {
                    return Err(Error::DanglingNode {
                        node: self.node_name(*id).to_string(),
                        element: only.card_name(),
                    });
                }
                _ => {}
            }
        }

        for element in &self.elements {
            let Some(model_name) = element.model() else {
                continue;
            };
            let model = self.get_model(model_name).ok_or_else(|| Error::UnknownModel {
                element: element.card_name(),
                model: model_name.to_string(),
            })?;
            let matches = match element {
                Element::Diode { .. } => model.kind == ModelKind::Diode,
                Element::Bjt { .. } => model.kind.is_bjt(),
                _ => true,
            };
            if !matches {
                let expected = match element {
                    Element::Diode { .. } => "D",
                    _ => "NPN/PNP",
                };
                return Err(Error::ModelKindMismatch {
                    element: element.card_name(),
                    model: model.name.clone(),
                    expected: expected.to_string(),
                    actual: model.kind.to_string(),
                });
            }
        }

        Ok(())
    }
}

fn invalid(element: &str, what: &str, reason: &str) -> Error {
    Error::InvalidValue {
        name: format!("{} {}", element, what),
        reason: reason.to_string(),
    }
}

fn positive(element: &str, what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(element, what, &format!("must be positive, got {}", value)))
    }
}
